use colored::Colorize;
use memo::api::{CmdMessage, MessageLevel};
use memo::config::MemoConfig;
use memo::model::{NewTagFileOptions, WorkingArea};
use memo::options::UserOptions;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_working_area(area: &WorkingArea) {
    for (filename, entries) in area {
        println!("{}", filename.bold());
        for (i, entry) in entries.iter().enumerate() {
            print_entry(i, entry);
        }
    }
}

fn print_entry(index: usize, entry: &str) {
    let idx_str = format!("  {}. ", index);
    let available = LINE_WIDTH.saturating_sub(idx_str.width());

    let mut lines = entry.lines();
    let first = lines.next().unwrap_or_default();
    println!("{}{}", idx_str.yellow(), truncate_to_width(first, available));

    let indent = " ".repeat(idx_str.width());
    for line in lines {
        println!("{}{}", indent, truncate_to_width(line, available).dimmed());
    }
}

pub(super) fn print_pending(pending: &NewTagFileOptions) {
    if pending.is_empty() {
        return;
    }
    println!();
    if !pending.tags.is_empty() {
        println!("{} {}", "New tags:".dimmed(), numbered(&pending.tags));
    }
    if !pending.files.is_empty() {
        println!("{} {}", "New files:".dimmed(), numbered(&pending.files));
    }
}

fn numbered(values: &[String]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}. {}", i, v))
        .collect::<Vec<_>>()
        .join("  ")
}

pub(super) fn print_settings(options: &UserOptions, config: &MemoConfig) {
    let user = UserOptions::KEYS
        .iter()
        .map(|k| (*k, options.get(k).unwrap_or_default()));
    let client = MemoConfig::KEYS
        .iter()
        .map(|k| (*k, config.get(k).unwrap_or_default()));
    for (key, value) in user.chain(client) {
        println!("{} = {}", key, value);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("- [a](b)", 20), "- [a](b)");
    }

    #[test]
    fn pending_values_are_numbered_from_zero() {
        assert_eq!(
            numbered(&["rust".to_string(), "wasm".to_string()]),
            "0. rust  1. wasm"
        );
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate_to_width("日本語のメモ", 7), "日本語…");
    }
}
