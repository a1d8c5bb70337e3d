pub mod game;
pub mod lifeline;
pub mod question;

pub use game::{AnswerOutcome, Game, GameStatus, LadderRules};
pub use lifeline::{Confidence, HelpPayload, Lifeline};
pub use question::{GameQuestion, QuestionTemplate, Slot, ANSWER_COUNT};
