use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::quiz::{option_label, Exam, Question};

pub const EXAM_EXTENSION: &str = "exam";

/// Loads an exam from a pipe-delimited text file, one question per line:
/// `QUESTION_TEXT|OPTION1;OPTION2;...|ANSWER`.
///
/// Blank lines are skipped and lines that do not split into exactly three
/// fields are dropped without a diagnostic. A missing or unreadable file is
/// reported and yields an empty exam, which the caller treats as a failed
/// load.
pub fn load_exam(path: &Path) -> Exam {
    let source = path.display().to_string();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::error!("Error: {} not found ({})", source, err);
            return Exam::new(Vec::new(), source);
        }
    };

    let mut questions = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("Failed to read {}: {}", source, err);
                return Exam::new(Vec::new(), source);
            }
        };
        if let Some(question) = parse_line(&line) {
            questions.push(question);
        }
    }

    log::debug!("Loaded {} questions from {}", questions.len(), source);
    return Exam::new(questions, source);
}

fn parse_line(line: &str) -> Option<Question> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() != 3 {
        return None;
    }

    let text = parts[0].trim().to_string();
    let options: Vec<String> = parts[1].split(';').map(|o| o.trim().to_string()).collect();
    let answer = parse_answer(parts[2], &options, &text);

    Some(Question::new(text, options, answer))
}

/// Normalizes the answer field. A field starting with a digit is a 1-based
/// option index and maps to the matching letter; anything else is kept as a
/// trimmed, lowercased letter. An unusable field keeps the question but
/// stores an answer no trimmed user input can ever equal.
fn parse_answer(field: &str, options: &[String], question: &str) -> String {
    let field = field.trim();

    if field.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        match field.parse::<usize>() {
            Ok(index) if index >= 1 && index <= options.len() => {
                if let Some(letter) = option_label(index) {
                    return letter.to_string();
                }
            }
            _ => {}
        }
        log::warn!("Invalid answer index for question: {}", question);
        return " ".to_string();
    }

    if field.is_empty() {
        log::warn!("Invalid answer format for question: {}", question);
        return " ".to_string();
    }

    return field.to_lowercase();
}

/// Lists the `.exam` files directly inside `dir`, sorted by name so the
/// selection menu is stable.
pub fn list_exam_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == EXAM_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_line() {
        let q = parse_line("Q|O1;O2;O3|b").unwrap();
        assert_eq!(q.text, "Q");
        assert_eq!(q.options, vec!["O1", "O2", "O3"]);
        assert_eq!(q.answer, "b");
    }

    #[test]
    fn trims_whitespace_around_fields_and_options() {
        let q = parse_line("  What? | yes ; no |  B ").unwrap();
        assert_eq!(q.text, "What?");
        assert_eq!(q.options, vec!["yes", "no"]);
        assert_eq!(q.answer, "b");
    }

    #[test]
    fn drops_lines_with_wrong_arity() {
        assert!(parse_line("no pipes at all").is_none());
        assert!(parse_line("only|two").is_none());
        assert!(parse_line("one|too|many|fields").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn maps_numeric_answers_to_letters() {
        let q = parse_line("Q|x;y;z|2").unwrap();
        assert_eq!(q.answer, "b");
        let q = parse_line("Q|x;y;z|1").unwrap();
        assert_eq!(q.answer, "a");
    }

    #[test]
    fn out_of_range_index_keeps_question_with_unmatchable_answer() {
        let q = parse_line("Q|x;y;z|4").unwrap();
        assert_eq!(q.options.len(), 3);
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct("d"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn load_exam_skips_blank_and_malformed_lines() {
        let path = std::env::temp_dir().join(format!("examiner-load-{}.exam", std::process::id()));
        std::fs::write(
            &path,
            "2+2=?|3;4;5|b\n\nbroken line\nCapital of France?|Paris;Rome|a\n",
        )
        .unwrap();

        let exam = load_exam(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(exam.questions.len(), 2);
        assert_eq!(exam.questions[0].text, "2+2=?");
        assert_eq!(exam.questions[1].answer, "a");
    }

    #[test]
    fn missing_file_yields_an_empty_exam() {
        let exam = load_exam(Path::new("definitely/not/here.exam"));
        assert!(exam.questions.is_empty());
    }
}
