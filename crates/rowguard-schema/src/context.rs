use rowguard_catalog::Store;
use rowguard_rules::{Context, Record};

/// Per-call inputs beyond the data itself.
///
/// `session` is the caller's store handle; `instance` is the persisted row being
/// updated, if any, so uniqueness checks skip it.
#[derive(Default)]
pub struct ValidationContext<'a> {
    session: Option<&'a dyn Store>,
    instance: Option<&'a Record>,
    rules: Context,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, session: &'a dyn Store) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_instance(mut self, instance: &'a Record) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Values forwarded to every field rule
    pub fn with_rule_context(mut self, rules: Context) -> Self {
        self.rules = rules;
        self
    }

    pub fn session(&self) -> Option<&'a dyn Store> {
        self.session
    }

    pub fn instance(&self) -> Option<&'a Record> {
        self.instance
    }

    pub fn rule_context(&self) -> &Context {
        &self.rules
    }
}
