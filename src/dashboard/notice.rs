#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient notification for the user, e.g. a toast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub title: Option<String>,
    pub description: Option<String>,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn described(description: impl Into<String>) -> Self {
        Self { description: Some(description.into()), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn destructive(mut self) -> Self {
        self.variant = NoticeVariant::Destructive;
        self
    }

    /// Title if present, otherwise the description.
    pub fn text(&self) -> &str {
        self.title.as_deref().or(self.description.as_deref()).unwrap_or_default()
    }
}
