/// Check an answer; `Err` carries the message shown before asking again.
pub type Validator = fn(&str) -> Result<(), String>;

/// A yes/no confirmation prompt.
pub struct YesNoPrompt {
    pub question: String,
    /// true = default yes [Y/n], false = default no [y/N]
    pub default: bool,
}

/// Select one option from a list.
pub struct SelectPrompt {
    pub question: String,
    pub options: Vec<SelectOption>,
    pub default_index: Option<usize>,
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub hint: Option<String>,
}

/// Free text input.
pub struct TextPrompt {
    pub question: String,
    /// Used when the answer is blank, and checked by `validate` like typed input
    pub default: Option<String>,
    pub validate: Option<Validator>,
}
