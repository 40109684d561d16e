use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("Invalid ANSI escape pattern")
});

/// Removes terminal escape sequences (colors, cursor movement) from `text`.
pub fn strip_ansi_codes(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_sequences() {
        let colored = "\x1b[91mCUDA OOM\x1b[0m while sampling";
        assert_eq!(strip_ansi_codes(colored), "CUDA OOM while sampling");
    }

    #[test]
    fn strips_cursor_and_erase_sequences() {
        let progress = "Predicting 10%\x1b[2K\x1b[1G\rPredicting 20%";
        assert_eq!(strip_ansi_codes(progress), "Predicting 10%\rPredicting 20%");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(strip_ansi_codes("no escapes here"), "no escapes here");
    }
}
