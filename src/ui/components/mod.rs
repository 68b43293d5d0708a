mod confirm_dialog;
mod input;
mod key_result;

pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
