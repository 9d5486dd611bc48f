// Inherit keeps whatever the deploy already recorded, All is the explicit
// wildcard, Only is a real filter. Inherit and All must stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subpaths {
    Inherit,
    All,
    Only(Vec<String>),
}

impl Subpaths {
    pub fn from_list(subpaths: Vec<String>) -> Self {
        if subpaths.is_empty() {
            Self::All
        } else {
            Self::Only(subpaths)
        }
    }

    pub fn from_option(subpaths: Option<Vec<String>>) -> Self {
        match subpaths {
            None => Self::Inherit,
            Some(list) => Self::from_list(list),
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Only(_))
    }

    pub fn render(&self) -> String {
        match self {
            Self::Inherit => "[$old]".to_string(),
            Self::All => "[*]".to_string(),
            Self::Only(list) => format!("[{}]", list.join(", ")),
        }
    }
}
