mod quiz;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use quiz::loader;
use quiz::{option_label, AttemptResult, Band, Exam};

#[derive(Parser, Debug)]
#[command(name = "examiner", version, about = "Terminal-based multiple-choice exam runner")]
struct Args {
    /// Path to an .exam file. When omitted, .exam files in the current
    /// directory are listed for selection.
    exam_file: Option<PathBuf>,
}

/// Session states. Each state carries everything it needs so the controller
/// loop owns no other mutable state.
#[derive(Debug, Clone)]
enum State {
    SelectingExam,
    Running {
        exam: Exam,
    },
    Finished {
        exam: Exam,
        score: usize,
        incorrect: Vec<AttemptResult>,
    },
    Exit,
}

/// Menu-driven controller for one interactive session. Input and output are
/// generic so tests can drive it with in-memory buffers.
struct Session<R, W> {
    input: R,
    output: W,
    /// Exam path given on the command line; when set, exam selection uses it
    /// directly instead of listing the working directory.
    cli_exam: Option<PathBuf>,
    exam_dir: PathBuf,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn new(input: R, output: W, cli_exam: Option<PathBuf>, exam_dir: PathBuf) -> Self {
        Self {
            input,
            output,
            cli_exam,
            exam_dir,
        }
    }

    fn run(mut self) -> io::Result<()> {
        let mut state = State::SelectingExam;
        loop {
            state = match state {
                State::SelectingExam => self.select_exam()?,
                State::Running { exam } => self.run_exam(exam)?,
                State::Finished {
                    exam,
                    score,
                    incorrect,
                } => self.show_results(exam, score, incorrect)?,
                State::Exit => return Ok(()),
            };
        }
    }

    fn select_exam(&mut self) -> io::Result<State> {
        let path = match self.cli_exam.clone() {
            Some(path) => {
                writeln!(self.output, "Using exam file: {}", path.display())?;
                path
            }
            None => {
                let exam_files = loader::list_exam_files(&self.exam_dir)?;
                if exam_files.is_empty() {
                    writeln!(
                        self.output,
                        "No .exam files found in the current directory. Exiting..."
                    )?;
                    return Ok(State::Exit);
                }

                writeln!(self.output, "Available exams:")?;
                for (idx, file) in exam_files.iter().enumerate() {
                    writeln!(self.output, "{}. {}", idx + 1, file.display())?;
                }

                let choice = self.read_line("Choose an exam by number: ")?;
                let choice: usize = match choice.trim().parse() {
                    Ok(n) => n,
                    Err(_) => {
                        writeln!(self.output, "Invalid choice. Exiting...")?;
                        return Ok(State::Exit);
                    }
                };
                if choice < 1 || choice > exam_files.len() {
                    writeln!(self.output, "Invalid choice. Exiting...")?;
                    return Ok(State::Exit);
                }

                let path = exam_files[choice - 1].clone();
                writeln!(self.output, "Using selected file: {}", path.display())?;
                path
            }
        };

        let mut exam = loader::load_exam(&path);
        if exam.questions.is_empty() {
            writeln!(self.output, "Failed to load questions. Exiting...")?;
            return Ok(State::Exit);
        }

        let scramble = self.read_line("Do you want to scramble the exam questions? (y/n): ")?;
        if scramble.trim().eq_ignore_ascii_case("y") {
            exam.scramble();
        }

        Ok(State::Running { exam })
    }

    fn run_exam(&mut self, exam: Exam) -> io::Result<State> {
        let mut score = 0;
        let mut incorrect: Vec<AttemptResult> = Vec::new();
        let total = exam.questions.len();

        self.clear_screen()?;
        writeln!(
            self.output,
            "Loaded {} questions from {}.",
            total, exam.source
        )?;
        writeln!(self.output, "\n--- Starting the Exam ---")?;

        for (idx, question) in exam.questions.iter().enumerate() {
            self.clear_screen()?;
            writeln!(
                self.output,
                "\nQuestion {}/{}: {}",
                idx + 1,
                total,
                question.text
            )?;
            for (i, option) in question.options.iter().enumerate() {
                let label = option_label(i + 1).unwrap_or('?');
                writeln!(self.output, "  {}. {}", label, option)?;
            }

            let answer = self.read_line("Your answer (a/b/c/d/e): ")?;
            let answer = answer.trim().to_lowercase();
            if question.is_correct(&answer) {
                writeln!(self.output, "Correct!")?;
                score += 1;
            } else {
                writeln!(
                    self.output,
                    "Wrong! The correct answer was: {}",
                    question.answer
                )?;
                incorrect.push(AttemptResult::new(
                    question.text.clone(),
                    answer,
                    question.answer.clone(),
                ));
            }
            writeln!(self.output, "Current Score: {}/{}", score, idx + 1)?;
            self.pause("\nPress Enter to continue...")?;
        }

        Ok(State::Finished {
            exam,
            score,
            incorrect,
        })
    }

    fn show_results(
        &mut self,
        exam: Exam,
        score: usize,
        incorrect: Vec<AttemptResult>,
    ) -> io::Result<State> {
        let total = exam.questions.len();
        // An empty exam never reaches this state, so total is non-zero.
        let percentage = score as f64 / total as f64 * 100.0;

        self.clear_screen()?;
        writeln!(self.output, "\n--- Exam Finished ---")?;
        writeln!(self.output, "Your final score: {}/{}", score, total)?;
        writeln!(self.output, "Your performance: {:.2}%", percentage)?;
        writeln!(self.output, "{}", Band::from_percentage(percentage).message())?;

        loop {
            writeln!(self.output, "\nWhat would you like to do next?")?;
            writeln!(self.output, "1. View incorrect answers")?;
            writeln!(self.output, "2. Restart this exam")?;
            writeln!(self.output, "3. Pick another exam")?;
            writeln!(self.output, "4. Exit")?;

            let choice = self.read_line("Enter your choice: ")?;
            match choice.trim() {
                "1" => self.view_incorrect(&incorrect)?,
                "2" => return Ok(State::Running { exam }),
                "3" => return Ok(State::SelectingExam),
                "4" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(State::Exit);
                }
                other => {
                    log::debug!("Rejected menu input: {:?}", other);
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    std::thread::sleep(Duration::from_secs(2));
                }
            }
        }
    }

    fn view_incorrect(&mut self, incorrect: &[AttemptResult]) -> io::Result<()> {
        self.clear_screen()?;
        if incorrect.is_empty() {
            writeln!(self.output, "\nNo incorrect answers. Well done!")?;
        } else {
            writeln!(self.output, "\n--- Incorrect Answers ---")?;
            for (idx, attempt) in incorrect.iter().enumerate() {
                writeln!(self.output, "\n{}. {}", idx + 1, attempt.question)?;
                writeln!(self.output, "   Your answer: {}", attempt.user_answer)?;
                writeln!(self.output, "   Correct answer: {}", attempt.correct_answer)?;
            }
        }
        self.pause("\nPress Enter to return to the menu...")?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let bytes = self.input.read_line(&mut line)?;
        if bytes == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line)
    }

    fn pause(&mut self, prompt: &str) -> io::Result<()> {
        self.read_line(prompt).map(|_| ())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        // ANSI clear + cursor home; dumb terminals just print the escape.
        write!(self.output, "\x1B[2J\x1B[1;1H")?;
        self.output.flush()
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();
    log::info!("Starting exam session...");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let session = Session::new(
        stdin.lock(),
        stdout.lock(),
        args.exam_file,
        std::env::current_dir()?,
    );
    session.run()?;
    Ok(())
}
