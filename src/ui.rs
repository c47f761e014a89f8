use colored::Colorize;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use std::sync::atomic::{AtomicBool, Ordering};
use supports_color::Stream;

use crate::command_name;
use crate::{
    CANCELLED_MESSAGE, LIST_HINT_ACTIVATE, LIST_HINT_CREATE, LIST_HINT_LIST, LIST_MSG_EMPTY,
    UI_INFO_PREFIX, UI_WARNING_PREFIX,
};

static PLAIN: AtomicBool = AtomicBool::new(false);

pub fn set_plain(value: bool) {
    PLAIN.store(value, Ordering::Relaxed);
}

pub fn is_plain() -> bool {
    PLAIN.load(Ordering::Relaxed)
}

pub fn use_color_stdout() -> bool {
    supports_color(Stream::Stdout)
}

pub fn use_color_stderr() -> bool {
    supports_color(Stream::Stderr)
}

fn supports_color(stream: Stream) -> bool {
    if is_plain() {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    supports_color::on(stream).is_some()
}

pub fn style_text<F>(text: &str, use_color: bool, style: F) -> String
where
    F: FnOnce(colored::ColoredString) -> colored::ColoredString,
{
    if use_color && !is_plain() {
        style(text.normal()).to_string()
    } else {
        text.to_string()
    }
}

pub fn format_cmd(command: &str, use_color: bool) -> String {
    let text = format!("`{command}`");
    style_text(&text, use_color, |text| text.yellow().bold())
}

pub fn format_action(message: &str, use_color: bool) -> String {
    let text = format!("✅ {message}");
    style_text(&text, use_color, |text| text.green().bold())
}

pub fn format_warning(message: &str, use_color: bool) -> String {
    let prefix = UI_WARNING_PREFIX;
    let mut lines = message.lines();
    let first = lines.next().unwrap_or_default();
    let mut text = format!("{prefix}{first}");
    let indent = " ".repeat(prefix.len());
    for line in lines {
        text.push('\n');
        text.push_str(&indent);
        text.push_str(line);
    }
    style_text(&text, use_color, |text| text.yellow().dimmed().italic())
}

pub fn warn(message: &str) {
    eprintln!("{}", format_warning(message, use_color_stderr()));
}

pub fn format_cancel(use_color: bool) -> String {
    style_text(CANCELLED_MESSAGE, use_color, |text| text.dimmed().italic())
}

pub fn format_hint(message: &str, use_color: bool) -> String {
    if is_plain() {
        crate::msg1(UI_INFO_PREFIX, message)
    } else {
        let message = format!("\n\n{message}");
        style_text(&message, use_color, |text| text.italic())
    }
}

pub fn format_no_profiles(use_color: bool) -> String {
    let create = format_command("create <name>", use_color);
    let hint = format_hint(&LIST_HINT_CREATE.replace("{create}", &create), use_color);
    crate::msg1(LIST_MSG_EMPTY, hint)
}

pub fn format_list_hint(use_color: bool) -> String {
    let list = format_command("list", use_color);
    format_hint(&LIST_HINT_LIST.replace("{list}", &list), use_color)
}

pub fn format_activate_hint(use_color: bool) -> String {
    let activate = format_command("activate <name>", use_color);
    format_hint(
        &LIST_HINT_ACTIVATE.replace("{activate}", &activate),
        use_color,
    )
}

pub fn format_error(message: &str) -> String {
    let use_color = use_color_stdout();
    let prefix = if use_color {
        crate::UI_ERROR_PREFIX.red().bold().to_string()
    } else {
        crate::UI_ERROR_PREFIX.to_string()
    };
    let stripped = message
        .strip_prefix(&format!("{} ", crate::UI_ERROR_PREFIX))
        .unwrap_or(message);
    let mut lines = stripped.lines();
    let first = lines.next().unwrap_or_default();
    let mut text = format!("{prefix} {first}");
    for line in lines {
        text.push('\n');
        text.push_str(&style_text(line, use_color, |text| text.dimmed().italic()));
    }
    text
}

/// One list row: mode badge plus the profile name, the active profile
/// highlighted.
pub fn format_profile_entry(
    name: &str,
    mode_label: &str,
    is_current: bool,
    use_color: bool,
) -> String {
    let badge_text = format!(" {} ", mode_label.to_uppercase());
    let badge = if use_color {
        badge_text.white().on_bright_black().to_string()
    } else {
        format!("[{}]", mode_label.to_uppercase())
    };
    let name_part = if use_color {
        let styled = format!(" {name} ");
        if is_current {
            styled.white().on_green().to_string()
        } else {
            styled.white().on_magenta().to_string()
        }
    } else if is_current {
        format!(" {name} (active)")
    } else {
        format!(" {name}")
    };
    format!("{badge}{name_part}")
}

pub fn inquire_select_render_config() -> RenderConfig<'static> {
    let mut config = if use_color_stderr() {
        let mut config = RenderConfig::default_colored();
        config.help_message = StyleSheet::new().with_fg(Color::DarkGrey);
        config
    } else {
        RenderConfig::empty()
    };
    config.prompt_prefix = Styled::new("");
    config.answered_prompt_prefix = Styled::new("");
    config
}

pub fn is_inquire_cancel(err: &inquire::error::InquireError) -> bool {
    matches!(
        err,
        inquire::error::InquireError::OperationCanceled
            | inquire::error::InquireError::OperationInterrupted
    )
}

const OUTPUT_INDENT: &str = " ";

pub fn print_output_block(message: &str) {
    let message = if is_plain() {
        message.to_string()
    } else {
        indent_output(message)
    };
    println!("\n{message}\n");
}

fn indent_output(message: &str) -> String {
    message
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{OUTPUT_INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_command(cmd: &str, use_color: bool) -> String {
    let name = command_name();
    let full = if cmd.is_empty() {
        name.to_string()
    } else {
        format!("{name} {cmd}")
    };
    format_cmd(&full, use_color)
}
