fn main() {
    claude_profiles::run_cli();
}
