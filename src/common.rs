/// Kinds of resource the API can be asked about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceKind {
    Video,
    Channel,
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Channel => "channel",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
