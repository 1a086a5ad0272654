pub mod answer;
pub mod session;
pub mod stats;
pub mod telegram;

pub use answer::{AnswerKeyDocument, Mistake, ScoreReport};
pub use session::SessionState;
pub use stats::{StatsDocument, StatsMap, UserRecord};
pub use telegram::{ChatId, Message, Reply, ReplyKeyboardMarkup, Update, User, UserId};
