//! Token dispatch: delivering the destinations an alias expands to
//!
//! The engine hands every matched expansion to a [`TokenDispatcher`]. A
//! dispatcher splits the text into destinations and delivers each one,
//! calling back into the resolver for local names so that nested aliases
//! are expanded with the frame and rights the engine derived.
//!
//! [`ExpansionPlanner`] is the reference dispatcher. It performs no actual
//! deliveries; it records the plan of where the message would go and with
//! which rights.

use crate::engine::AliasResolver;
use crate::error::Result;
use localmail_core::{
    DeliveryRights, DeliveryStatus, ExpansionType, LocalState, Resolution, UserAttr,
};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

/// Delivers the destinations listed in an alias expansion
pub trait TokenDispatcher: Send + Sync {
    /// Deliver every destination in `expansion`
    ///
    /// `state` and `attr` are the frame and rights derived for this
    /// expansion. Nested resolution goes through `resolver`.
    fn deliver(
        &self,
        resolver: &AliasResolver,
        state: &LocalState,
        attr: &UserAttr,
        expansion: &str,
    ) -> Result<DeliveryStatus>;
}

/// Where a planned delivery goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "lowercase")]
pub enum Destination {
    /// Local user mailbox
    Mailbox(String),
    /// `|command`
    Command(String),
    /// `/file/name`
    File(String),
    /// `:include:/file/name`
    Include(String),
    /// Address outside the local origin
    Remote(String),
}

/// One delivery the planner would perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedDelivery {
    pub destination: Destination,

    /// Top-level recipient this delivery descends from
    pub recipient: String,

    /// Envelope sender for problem reports
    pub sender: String,

    /// Owner attribute in effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Delivered-To address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<String>,

    /// How the destination was reached
    pub exp_type: ExpansionType,

    /// Account whose rights apply to command and file deliveries
    pub run_as: String,

    /// Nesting depth at which the destination was found
    pub level: u32,
}

/// Reference dispatcher that records a delivery plan
pub struct ExpansionPlanner {
    myorigin: String,
    default_privs: String,
    plan: Mutex<Vec<PlannedDelivery>>,
}

impl ExpansionPlanner {
    /// Create a planner for a local origin domain
    ///
    /// `default_privs` names the account that default rights stand for.
    pub fn new(myorigin: impl Into<String>, default_privs: impl Into<String>) -> Self {
        Self {
            myorigin: myorigin.into(),
            default_privs: default_privs.into(),
            plan: Mutex::new(Vec::new()),
        }
    }

    /// Planned deliveries so far, in order
    pub fn deliveries(&self) -> Vec<PlannedDelivery> {
        self.plan.lock().clone()
    }

    /// Plan delivery for a top-level recipient
    ///
    /// Resolves the recipient as an alias first; a recipient that is not an
    /// alias is planned as a mailbox delivery.
    pub fn plan_recipient(
        &self,
        resolver: &AliasResolver,
        state: &LocalState,
        attr: &UserAttr,
    ) -> Result<DeliveryStatus> {
        match resolver.resolve(state, attr)? {
            Resolution::Handled(status) => Ok(status),
            Resolution::NotAlias => {
                self.record(Destination::Mailbox(state.local.clone()), state, attr);
                Ok(DeliveryStatus::Ok)
            }
        }
    }

    fn deliver_token(
        &self,
        resolver: &AliasResolver,
        state: &LocalState,
        attr: &UserAttr,
        token: &str,
    ) -> Result<DeliveryStatus> {
        let destination = match self.classify(token) {
            Destination::Mailbox(local) => {
                let child = state.for_token(local.clone());
                return self.plan_recipient(resolver, &child, attr);
            }
            destination => destination,
        };

        self.record(destination, state, attr);
        Ok(DeliveryStatus::Ok)
    }

    fn classify(&self, token: &str) -> Destination {
        if let Some(command) = token.strip_prefix('|') {
            return Destination::Command(command.trim().to_string());
        }
        if token.starts_with('/') {
            return Destination::File(token.to_string());
        }
        if let Some(path) = token.strip_prefix(":include:") {
            return Destination::Include(path.trim().to_string());
        }

        match token.rsplit_once('@') {
            Some((local, domain)) if domain.eq_ignore_ascii_case(&self.myorigin) => {
                Destination::Mailbox(local.to_string())
            }
            Some(_) => Destination::Remote(token.to_string()),
            None => Destination::Mailbox(token.to_string()),
        }
    }

    fn record(&self, destination: Destination, state: &LocalState, attr: &UserAttr) {
        let run_as = match (&attr.rights, &attr.logname) {
            (DeliveryRights::Account { .. }, Some(name)) => name.clone(),
            (DeliveryRights::Account { uid, .. }, None) => format!("uid {}", uid),
            (DeliveryRights::Default, _) => self.default_privs.clone(),
        };

        debug!("plan[{}]: {:?} as {}", state.level, destination, run_as);

        self.plan.lock().push(PlannedDelivery {
            destination,
            recipient: state.recipient.clone(),
            sender: state.sender.clone(),
            owner: state.owner.clone(),
            delivered: state.delivered.clone(),
            exp_type: state.exp_type,
            run_as,
            level: state.level,
        });
    }
}

impl TokenDispatcher for ExpansionPlanner {
    fn deliver(
        &self,
        resolver: &AliasResolver,
        state: &LocalState,
        attr: &UserAttr,
        expansion: &str,
    ) -> Result<DeliveryStatus> {
        let mut status = DeliveryStatus::Ok;

        for token in tokenize(expansion) {
            status = status.combine(self.deliver_token(resolver, state, attr, &token)?);
        }

        Ok(status)
    }
}

/// Split expansion text into destinations
///
/// Separators are commas and whitespace outside double quotes. Quotes are
/// removed, so `"|/usr/bin/vacation alice"` is one command token.
pub fn tokenize(expansion: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in expansion.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' | ' ' | '\t' | '\r' | '\n' if !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
