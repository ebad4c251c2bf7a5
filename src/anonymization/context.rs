//! Rewriter state: suppression context and record scopes

use crate::anonymization::rules::ElementRole;
use quick_xml::events::Event;

/// Nesting depth of one kind of trigger element
///
/// A plain flag would be cleared by the inner end tag of `<Address><Address/></Address>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Depth(u32);

impl Depth {
    pub fn enter(&mut self) {
        self.0 += 1;
    }

    /// Unmatched end tags never drive the depth below zero
    pub fn leave(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_active(self) -> bool {
        self.0 > 0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Which trigger elements enclose the cursor
#[derive(Debug, Clone, Default)]
pub struct SuppressionContext {
    pub identifier_value: Depth,
    pub identifier_type: Depth,
    pub passport: Depth,
    pub address: Depth,
    pub address_parent: Depth,
    pub ignored: Depth,
    hide_identifier_type: bool,
}

impl SuppressionContext {
    /// Context where identifier-type content is withheld when
    /// `hide_identifier_type` is set
    pub fn new(hide_identifier_type: bool) -> Self {
        Self {
            hide_identifier_type,
            ..Self::default()
        }
    }

    /// Raises the depth matching `role`; roles without context are ignored
    pub fn enter(&mut self, role: ElementRole) {
        if let Some(depth) = self.depth_mut(role) {
            depth.enter();
        }
    }

    /// Lowers the depth matching `role`
    pub fn leave(&mut self, role: ElementRole) {
        if let Some(depth) = self.depth_mut(role) {
            depth.leave();
        }
    }

    /// Whether content at the cursor is withheld from the output
    pub fn suppresses_content(&self) -> bool {
        self.identifier_value.is_active()
            || self.passport.is_active()
            || (self.address_parent.is_active() && self.address.is_active())
            || self.ignored.is_active()
            || (self.hide_identifier_type && self.identifier_type.is_active())
    }

    /// Whether character data at the cursor belongs to an identifier field
    pub fn is_capturing(&self) -> bool {
        self.identifier_value.is_active() || self.identifier_type.is_active()
    }

    /// Clears identifier tracking when a record scope closes
    pub fn reset_identifier(&mut self) {
        self.identifier_value.reset();
        self.identifier_type.reset();
    }

    fn depth_mut(&mut self, role: ElementRole) -> Option<&mut Depth> {
        match role {
            ElementRole::IdentifierValue => Some(&mut self.identifier_value),
            ElementRole::IdentifierType => Some(&mut self.identifier_type),
            ElementRole::Passport => Some(&mut self.passport),
            ElementRole::Address => Some(&mut self.address),
            ElementRole::AddressParent => Some(&mut self.address_parent),
            ElementRole::Ignored => Some(&mut self.ignored),
            ElementRole::Person | ElementRole::Other => None,
        }
    }
}

/// An identifier value whose type has not arrived yet
#[derive(Debug, Clone)]
pub struct HeldIdentifier {
    /// Namespace prefix of the identifier-value element
    pub prefix: Option<String>,
    /// Raw value
    pub value: String,
    /// Whether the value element sat outside every suppressing context
    pub visible: bool,
}

/// Identifier record of one person-bearing element
#[derive(Debug, Default)]
pub struct RecordScope {
    pub identifier_type: String,
    pub identifier_value: String,
    /// Set once the identifier-type element has closed
    pub type_complete: bool,
    pub value_prefix: Option<String>,
    pub value_visible: bool,
    pub held: Option<HeldIdentifier>,
    /// Output produced after `held` was set, replayed behind the identifier
    pub pending: Vec<Event<'static>>,
}

impl RecordScope {
    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }
}

/// Stack of record scopes
///
/// The bottom scope is implicit and never popped; it collects identifiers
/// that appear outside any person-bearing element.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<RecordScope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![RecordScope::default()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(RecordScope::default());
    }

    /// Pops the innermost scope, or resets the root scope on an unmatched close
    pub fn close(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            self.scopes[0] = RecordScope::default();
        }
    }

    /// Number of scopes, root included; never zero
    pub(crate) fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether only the root scope is open
    pub fn at_root(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn current_index(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_mut(&mut self) -> &mut RecordScope {
        let idx = self.current_index();
        &mut self.scopes[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut RecordScope {
        &mut self.scopes[idx]
    }

    /// Innermost scope below `idx` that is holding an identifier
    pub fn holding_below(&self, idx: usize) -> Option<usize> {
        self.scopes[..idx.min(self.scopes.len())]
            .iter()
            .rposition(RecordScope::is_holding)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
