/// Log tags, one per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Rpc,
    Pool,
    Decoder,
    Tokens,
    Output,
}

impl LogTag {
    /// Key used by --debug-<key> flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Rpc => "rpc",
            LogTag::Pool => "pool",
            LogTag::Decoder => "decoder",
            LogTag::Tokens => "tokens",
            LogTag::Output => "output",
        }
    }

    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}
