//! The quiz: ten questions, three answer styles, and one question that
//! refuses to take no for an answer.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Essay,
    MultipleChoice,
    Slider,
}

pub struct QuizOption {
    pub label: &'static str,
    pub text: &'static str,
    /// This option opens a free-text field instead of answering directly.
    pub has_essay: bool,
}

const fn opt(label: &'static str, text: &'static str) -> QuizOption {
    QuizOption { label, text, has_essay: false }
}

const fn essay_opt(label: &'static str, text: &'static str) -> QuizOption {
    QuizOption { label, text, has_essay: true }
}

pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub kind: QuestionKind,
    pub options: &'static [QuizOption],
    pub slider_min: u8,
    pub slider_max: u8,
    pub slider_labels: &'static [(u8, &'static str)],
    /// Words that bounce the answer (lowercased whole-word match).
    pub reject_words: &'static [&'static str],
    pub reject_message: &'static str,
}

const fn essay_q(id: u32, question: &'static str) -> QuizQuestion {
    QuizQuestion {
        id,
        question,
        kind: QuestionKind::Essay,
        options: &[],
        slider_min: 0,
        slider_max: 0,
        slider_labels: &[],
        reject_words: &[],
        reject_message: "",
    }
}

const fn choice_q(id: u32, question: &'static str, options: &'static [QuizOption]) -> QuizQuestion {
    QuizQuestion {
        id,
        question,
        kind: QuestionKind::MultipleChoice,
        options,
        slider_min: 0,
        slider_max: 0,
        slider_labels: &[],
        reject_words: &[],
        reject_message: "",
    }
}

pub static QUIZ_QUESTIONS: [QuizQuestion; 10] = [
    essay_q(
        1,
        "What food instantly makes you feel better when you're having a bad day?",
    ),
    essay_q(2, "What's your favorite place to go in Bandung?"),
    choice_q(
        3,
        "What's your favorite way to make Abid laugh?",
        &[
            opt("A", "Teasing him playfully"),
            opt("B", "Sending random memes"),
            opt("C", "Acting silly on purpose"),
            opt("D", "Giving unexpected compliments"),
            opt("E", "I don't try... he laughs because of me anyway"),
            essay_opt("F", "Other way"),
        ],
    ),
    choice_q(
        4,
        "What makes you feel most loved? (Love language edition)",
        &[
            opt("A", "Words of affirmation"),
            opt("B", "Quality time"),
            opt("C", "Acts of service"),
            opt("D", "Physical touch"),
            opt("E", "Thoughtful gifts"),
        ],
    ),
    QuizQuestion {
        id: 5,
        question: "The ultimate question: Would you say Abid is your favorite person?",
        kind: QuestionKind::MultipleChoice,
        options: &[
            opt("A", "Yes, obviously"),
            opt("B", "Yes, but don't let it get to his head"),
            opt("C", "Maybe... okay fine, yes"),
            opt("D", "He already knows the answer"),
            essay_opt("F", "Write it yourself"),
        ],
        slider_min: 0,
        slider_max: 0,
        slider_labels: &[],
        reject_words: &[
            "no", "nop", "nope", "nay", "nah", "tidak", "gak", "nggak", "enggak", "nein",
            "non", "iie", "lie", "never",
        ],
        reject_message: "Eits, tidak bisa menolak! Coba lagi ya cantikk.",
    },
    QuizQuestion {
        id: 6,
        question: "How much does Abid annoy you? (Be honest)",
        kind: QuestionKind::Slider,
        options: &[],
        slider_min: 1,
        slider_max: 10,
        slider_labels: &[
            (1, "Not at all"),
            (2, "Barely"),
            (3, "A tiny bit"),
            (4, "Sometimes"),
            (5, "Just enough"),
            (6, "Lovingly annoying"),
            (7, "Professionally annoying"),
            (8, "Expert level"),
            (9, "It's his talent"),
            (10, "Maximum annoyance, maximum love"),
        ],
        reject_words: &[],
        reject_message: "",
    },
    essay_q(7, "Are you truly happy at this point in your life?"),
    essay_q(
        8,
        "If you could write down one dream you truly want to achieve, what would it be?",
    ),
    choice_q(
        9,
        "When you're upset with Abid, how do you prefer him to handle it?",
        &[
            opt("A", "Give me space first"),
            opt("B", "Talk it out immediately"),
            opt("C", "Hug me first, talk later"),
            opt("D", "Send a long reassuring message"),
            opt("E", "Just say sorry sincerely"),
            essay_opt("F", "Write your soft request"),
        ],
    ),
    choice_q(
        10,
        "What makes you feel secure in a relationship?",
        &[
            opt("A", "Consistency"),
            opt("B", "Honest communication"),
            opt("C", "Loyalty"),
            opt("D", "Effort and attention"),
            opt("E", "Emotional support"),
            essay_opt("F", "Write the secret ingredient"),
        ],
    ),
];

/// One collected answer, shaped for the mail relay payload.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct QuizAnswer {
    #[serde(rename = "questionId")]
    pub question_id: u32,
    pub question: String,
    pub answer: String,
    #[serde(rename = "selectedOption", skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<String>,
}

/// True when the answer trips the question's reject list (whole lowercase
/// words only, so "nope" is caught but "piano" is not).
fn is_rejected(question: &QuizQuestion, answer: &str) -> bool {
    if question.reject_words.is_empty() {
        return false;
    }
    let lowered = answer.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| question.reject_words.contains(&word))
}

// ════════════════════════════════════════════════════════════════════════════
// QuizFlow — the page's state machine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStage {
    Welcome,
    Question,
    Summary,
    Done,
}

pub struct QuizFlow {
    stage: QuizStage,
    index: usize,
    answers: Vec<QuizAnswer>,
    selected: usize,
    slider_value: u8,
    essay: String,
    notice: Option<&'static str>,
}

impl Default for QuizFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizFlow {
    pub fn new() -> Self {
        QuizFlow {
            stage: QuizStage::Welcome,
            index: 0,
            answers: Vec::with_capacity(QUIZ_QUESTIONS.len()),
            selected: 0,
            slider_value: 5,
            essay: String::new(),
            notice: None,
        }
    }

    pub fn stage(&self) -> QuizStage {
        self.stage
    }

    pub fn begin(&mut self) {
        if self.stage == QuizStage::Welcome {
            self.stage = QuizStage::Question;
        }
    }

    pub fn question(&self) -> &'static QuizQuestion {
        &QUIZ_QUESTIONS[self.index.min(QUIZ_QUESTIONS.len() - 1)]
    }

    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        QUIZ_QUESTIONS.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_selection(&mut self, delta: i32) {
        let count = self.question().options.len();
        if count == 0 {
            return;
        }
        let cur = self.selected as i32;
        self.selected = (cur + delta).rem_euclid(count as i32) as usize;
        self.notice = None;
    }

    /// True when the current answer wants typed text.
    pub fn wants_text(&self) -> bool {
        match self.question().kind {
            QuestionKind::Essay => true,
            QuestionKind::MultipleChoice => self
                .question()
                .options
                .get(self.selected)
                .is_some_and(|o| o.has_essay),
            QuestionKind::Slider => false,
        }
    }

    pub fn essay(&self) -> &str {
        &self.essay
    }

    pub fn push_char(&mut self, c: char) {
        if self.wants_text() && (c.is_alphanumeric() || " .,!?'-".contains(c)) {
            self.essay.push(c);
            self.notice = None;
        }
    }

    pub fn pop_char(&mut self) {
        self.essay.pop();
    }

    pub fn slider(&self) -> u8 {
        self.slider_value
    }

    pub fn set_slider(&mut self, value: u8) {
        let q = self.question();
        if q.kind == QuestionKind::Slider {
            self.slider_value = value.clamp(q.slider_min, q.slider_max);
        }
    }

    /// Reject message for the last submit, if it bounced.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Submit the current answer. A bounced answer stays on the question
    /// with a notice; an accepted one advances (to Summary after the last).
    pub fn submit(&mut self) {
        if self.stage != QuizStage::Question {
            return;
        }
        let q = self.question();

        let (answer, selected_option) = match q.kind {
            QuestionKind::Essay => {
                let text = self.essay.trim().to_string();
                if text.is_empty() {
                    return;
                }
                (text, None)
            }
            QuestionKind::MultipleChoice => {
                let Some(option) = q.options.get(self.selected) else {
                    return;
                };
                if option.has_essay {
                    let text = self.essay.trim().to_string();
                    if text.is_empty() {
                        return;
                    }
                    (text, Some(option.label.to_string()))
                } else {
                    (option.text.to_string(), Some(option.label.to_string()))
                }
            }
            QuestionKind::Slider => {
                let label = q
                    .slider_labels
                    .iter()
                    .find(|(v, _)| *v == self.slider_value)
                    .map(|(_, l)| *l)
                    .unwrap_or("");
                (
                    format!("{}/{} - {}", self.slider_value, q.slider_max, label),
                    None,
                )
            }
        };

        if is_rejected(q, &answer) {
            self.notice = Some(q.reject_message);
            self.essay.clear();
            return;
        }

        self.answers.push(QuizAnswer {
            question_id: q.id,
            question: q.question.to_string(),
            answer,
            selected_option,
        });

        self.essay.clear();
        self.selected = 0;
        self.slider_value = 5;
        self.notice = None;
        self.index += 1;
        if self.index >= QUIZ_QUESTIONS.len() {
            self.stage = QuizStage::Summary;
        }
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    /// Leave the summary. Returns the collected answers exactly once so the
    /// caller can hand them to the mail relay.
    pub fn confirm(&mut self) -> Option<Vec<QuizAnswer>> {
        if self.stage != QuizStage::Summary {
            return None;
        }
        self.stage = QuizStage::Done;
        Some(self.answers.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
