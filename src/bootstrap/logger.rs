use anstyle::{AnsiColor, Style};
use env_logger::{Builder, Env, WriteStyle};
use log::kv::Key;
use std::io::Write;

const DIM: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::BrightBlack)));
const CYAN: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)));

/// Format a `duration` key-value as `"<number> <unit>"` with two decimals.
fn format_duration_field(raw: &str) -> String {
    if let Some(idx) = raw.find(|c: char| c.is_alphabetic() || c == 'µ') {
        let (num, unit) = (&raw[..idx], &raw[idx..]);
        if let Ok(val) = num.parse::<f32>() {
            return format!("{:.2} {}", val, unit);
        }
    }
    raw.to_string()
}

/// Fixed-width column for the optional `duration` key-value, blank when absent.
fn duration_column(record: &log::Record<'_>) -> String {
    match record.key_values().get(Key::from("duration")) {
        Some(value) => format!(
            "{}{:>10}{}",
            CYAN.render(),
            format_duration_field(&value.to_string()),
            CYAN.render_reset()
        ),
        None => " ".repeat(10),
    }
}

/// Initialize the global logger on stderr.
///
/// One line per record: timestamp, level, duration column, target and
/// message. Defaults to `info`; `RUST_LOG` overrides it. Safe to call more
/// than once.
pub fn initialize_logger() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .write_style(WriteStyle::Auto)
        .format(|buf, record| {
            let ts = buf.timestamp();
            let level_style = buf.default_level_style(record.level());
            let duration = duration_column(record);
            // Continuation lines of a multi-line message are folded into one.
            let message = record.args().to_string().replace('\n', " | ");

            writeln!(
                buf,
                "{} {}{:<5}{} {} {}{}{} {}",
                ts,
                level_style.render(),
                record.level(),
                level_style.render_reset(),
                duration,
                DIM.render(),
                record.target(),
                DIM.render_reset(),
                message
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_field_gets_two_decimals_and_spaced_unit() {
        assert_eq!(format_duration_field("1.234567s"), "1.23 s");
        assert_eq!(format_duration_field("12.5ms"), "12.50 ms");
        assert_eq!(format_duration_field("900µs"), "900.00 µs");
    }

    #[test]
    fn unparsable_duration_is_left_alone() {
        assert_eq!(format_duration_field("soon"), "soon");
    }

    #[test]
    fn duration_column_is_blank_without_the_key() {
        let record = log::Record::builder().args(format_args!("hello")).build();
        assert_eq!(duration_column(&record), " ".repeat(10));
    }

    #[test]
    fn initializing_twice_does_not_panic() {
        initialize_logger();
        initialize_logger();
    }
}
