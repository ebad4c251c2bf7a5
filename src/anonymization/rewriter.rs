//! Single-pass streaming rewriter
//!
//! Reads one document as a stream of `quick_xml` events and writes the
//! anonymized stream. No tree is built; the only state is the
//! [`SuppressionContext`] (which trigger elements enclose the cursor) and a
//! [`ScopeStack`] of identifier records, one per person-bearing element.
//!
//! Identifier values are replaced in place: the value element is swallowed
//! and a `<prefix:Indent>` element carrying the redacted value is written
//! where it closed. When the value precedes its type, everything the scope
//! produces afterwards is buffered until the type is known (or the scope
//! closes) so sibling order survives.

use crate::anonymization::context::{HeldIdentifier, ScopeStack, SuppressionContext};
use crate::anonymization::redactor::IdentifierRedactor;
use crate::anonymization::report::DocumentStats;
use crate::anonymization::rules::{ElementRole, ElementRules};
use crate::anonymization::salt::SaltStore;
use crate::anonymization::scrubber::FreeTextScrubber;
use crate::domain::{Result, XmlError};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::path::Path;

/// Where an emitted event goes
#[derive(Debug, Clone, Copy)]
enum Sink {
    Output,
    Scope(usize),
}

/// Collaborators shared by every document of a run
#[derive(Clone, Copy)]
pub struct RewriteRules<'a> {
    pub elements: &'a ElementRules,
    pub redactor: &'a IdentifierRedactor,
    pub scrubber: &'a FreeTextScrubber,
}

/// Stateful rewriter for one document
pub struct DocumentRewriter<'a, W: Write> {
    rules: RewriteRules<'a>,
    salts: &'a mut SaltStore,
    writer: Writer<W>,
    source: &'a Path,
    context: SuppressionContext,
    scopes: ScopeStack,
    stats: DocumentStats,
    position: u64,
}

impl<'a, W: Write> DocumentRewriter<'a, W> {
    /// Creates a rewriter writing to `output`
    ///
    /// `source` only labels errors.
    pub fn new(
        rules: RewriteRules<'a>,
        salts: &'a mut SaltStore,
        output: W,
        source: &'a Path,
    ) -> Self {
        Self {
            rules,
            salts,
            writer: Writer::new(output),
            source,
            context: SuppressionContext::new(!rules.elements.keeps_identifier_type()),
            scopes: ScopeStack::new(),
            stats: DocumentStats::new(),
            position: 0,
        }
    }

    /// Rewrites the whole of `input`, returning the statistics
    ///
    /// Any malformed input aborts the document; whatever was already written
    /// stays in the output.
    pub fn rewrite<R: BufRead>(mut self, input: R) -> Result<DocumentStats> {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut buf = Vec::new();
        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                XmlError::malformed(self.source, reader.buffer_position() as u64, e)
            })?;
            self.position = reader.buffer_position() as u64;

            match event {
                Event::Eof => break,
                Event::Start(e) => self.on_start(e, false)?,
                Event::Empty(e) => self.on_start(e, true)?,
                Event::End(e) => self.on_end(e)?,
                Event::Text(e) => self.on_text(e)?,
                Event::CData(e) => self.on_cdata(e)?,
                other => self.pass_through(other)?,
            }
            self.stats.events_read += 1;
            buf.clear();
        }

        self.finish()
    }

    fn on_start(&mut self, e: BytesStart<'_>, is_empty: bool) -> Result<()> {
        let role = self.rules.elements.role(e.local_name().as_ref());
        if role != ElementRole::IdentifierType {
            self.release_root_hold()?;
        }

        if role == ElementRole::IdentifierValue {
            self.enter_identifier_value(&e)?;
            if is_empty {
                self.close_element(role, None)?;
            }
            return Ok(());
        }

        let hides_self = self.rules.elements.hides_self(role);
        if hides_self {
            self.context.enter(role);
        }
        if role == ElementRole::IdentifierType {
            let scope = self.scopes.current_mut();
            scope.identifier_type.clear();
            scope.type_complete = false;
        }

        if self.context.suppresses_content() {
            self.stats.events_suppressed += 1;
        } else {
            let e = self.strip_attributes(e)?;
            let event = if is_empty {
                Event::Empty(e)
            } else {
                Event::Start(e)
            };
            self.emit(event)?;
        }

        if !hides_self {
            self.context.enter(role);
        }
        if role == ElementRole::Person {
            self.scopes.push();
        }

        if is_empty {
            self.close_element(role, None)?;
        }
        Ok(())
    }

    fn on_end(&mut self, e: BytesEnd<'_>) -> Result<()> {
        let role = self.rules.elements.role(e.local_name().as_ref());
        self.close_element(role, Some(e))
    }

    /// Close logic shared by end tags and self-closing elements; `end` is
    /// `None` when the start was `Event::Empty` and already written
    fn close_element(&mut self, role: ElementRole, end: Option<BytesEnd<'_>>) -> Result<()> {
        match role {
            ElementRole::IdentifierValue => {
                self.context.leave(role);
                return self.leave_identifier_value();
            }
            ElementRole::Person => return self.close_record_scope(end),
            ElementRole::IdentifierType => {}
            _ => self.release_root_hold()?,
        }

        let hides_self = self.rules.elements.hides_self(role);
        if !hides_self {
            self.context.leave(role);
        }
        if let Some(end) = end {
            self.emit_gated(Event::End(end))?;
        }
        if hides_self {
            self.context.leave(role);
        }

        if role == ElementRole::IdentifierType {
            self.on_identifier_type_closed()?;
        }
        Ok(())
    }

    fn enter_identifier_value(&mut self, e: &BytesStart<'_>) -> Result<()> {
        // A second value while the first still waits for its type
        if self.scopes.current_mut().is_holding() {
            self.release_scope(self.scopes.current_index())?;
        }

        let visible = !self.context.suppresses_content();
        let prefix = e
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());

        let scope = self.scopes.current_mut();
        scope.identifier_value.clear();
        scope.value_prefix = prefix;
        scope.value_visible = visible;

        self.context.enter(ElementRole::IdentifierValue);
        Ok(())
    }

    fn leave_identifier_value(&mut self) -> Result<()> {
        let scope = self.scopes.current_mut();
        let value = std::mem::take(&mut scope.identifier_value);
        let prefix = scope.value_prefix.take();
        let visible = scope.value_visible;

        if !scope.type_complete {
            scope.held = Some(HeldIdentifier {
                prefix,
                value,
                visible,
            });
            return Ok(());
        }

        let identifier_type = std::mem::take(&mut scope.identifier_type);
        scope.type_complete = false;
        if visible {
            let sink = self.current_sink();
            self.write_identifier(sink, prefix.as_deref(), &identifier_type, &value)?;
        }
        Ok(())
    }

    fn on_identifier_type_closed(&mut self) -> Result<()> {
        let scope = self.scopes.current_mut();
        scope.type_complete = true;
        if scope.is_holding() {
            self.release_scope(self.scopes.current_index())?;
        }
        Ok(())
    }

    fn close_record_scope(&mut self, end: Option<BytesEnd<'_>>) -> Result<()> {
        self.release_scope(self.scopes.current_index())?;
        self.scopes.close();
        self.context.reset_identifier();

        if let Some(end) = end {
            self.emit_gated(Event::End(end))?;
        }
        Ok(())
    }

    /// Outside any person-bearing element a value only waits for a type
    /// element that follows it directly; any other tag releases it
    fn release_root_hold(&mut self) -> Result<()> {
        if self.scopes.at_root() && self.scopes.current_mut().is_holding() {
            self.release_scope(0)?;
        }
        Ok(())
    }

    /// Writes the held identifier of scope `idx` followed by everything
    /// buffered behind it
    fn release_scope(&mut self, idx: usize) -> Result<()> {
        let scope = self.scopes.get_mut(idx);
        let Some(held) = scope.held.take() else {
            return Ok(());
        };
        let pending = std::mem::take(&mut scope.pending);
        let identifier_type = std::mem::take(&mut scope.identifier_type);
        scope.type_complete = false;

        let sink = self.sink_below(idx);
        if held.visible {
            self.write_identifier(sink, held.prefix.as_deref(), &identifier_type, &held.value)?;
        }
        for event in pending {
            self.emit_into(sink, event)?;
        }
        Ok(())
    }

    fn write_identifier(
        &mut self,
        sink: Sink,
        prefix: Option<&str>,
        identifier_type: &str,
        value: &str,
    ) -> Result<()> {
        let redaction = self
            .rules
            .redactor
            .redact(self.salts, identifier_type, value);
        self.stats.identifiers_emitted += 1;
        if redaction.is_hashed() {
            self.stats.identifiers_hashed += 1;
        }

        let local = self.rules.elements.identifier_output_element();
        let name = match prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        };

        self.emit_into(sink, Event::Start(BytesStart::new(name.as_str())))?;
        self.emit_into(sink, Event::Text(BytesText::new(redaction.value())))?;
        self.emit_into(sink, Event::End(BytesEnd::new(name.as_str())))
    }

    fn on_text(&mut self, e: BytesText<'_>) -> Result<()> {
        let suppressed = self.context.suppresses_content();
        if suppressed && !self.context.is_capturing() {
            self.stats.events_suppressed += 1;
            return Ok(());
        }

        let replaced = {
            let text = e
                .unescape()
                .map_err(|err| XmlError::invalid_text(self.source, err))?;
            self.capture(&text);

            if suppressed {
                self.stats.events_suppressed += 1;
                return Ok(());
            }

            match self.rules.scrubber.scrub(&text) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            }
        };
        match replaced {
            None => self.emit(Event::Text(e)),
            Some(scrubbed) => {
                self.stats.text_scrubbed += 1;
                self.emit(Event::Text(BytesText::new(&scrubbed)))
            }
        }
    }

    fn on_cdata(&mut self, e: BytesCData<'_>) -> Result<()> {
        let suppressed = self.context.suppresses_content();
        if suppressed && !self.context.is_capturing() {
            self.stats.events_suppressed += 1;
            return Ok(());
        }

        let replaced = {
            let text = std::str::from_utf8(&e)
                .map_err(|err| XmlError::invalid_text(self.source, err))?;
            self.capture(text);

            if suppressed {
                self.stats.events_suppressed += 1;
                return Ok(());
            }

            match self.rules.scrubber.scrub(text) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            }
        };
        match replaced {
            None => self.emit(Event::CData(e)),
            Some(scrubbed) => {
                self.stats.text_scrubbed += 1;
                // Deleting a match can splice a CDATA terminator together
                if scrubbed.contains("]]>") {
                    self.emit(Event::Text(BytesText::new(&scrubbed)))
                } else {
                    self.emit(Event::CData(BytesCData::new(scrubbed)))
                }
            }
        }
    }

    fn capture(&mut self, text: &str) {
        let capture_value = self.context.identifier_value.is_active();
        let capture_type = self.context.identifier_type.is_active();
        let scope = self.scopes.current_mut();
        if capture_value {
            scope.identifier_value.push_str(text);
        }
        if capture_type {
            scope.identifier_type.push_str(text);
        }
    }

    /// Comments, declarations, processing instructions and DOCTYPE
    fn pass_through(&mut self, event: Event<'_>) -> Result<()> {
        self.emit_gated(event)
    }

    fn strip_attributes<'e>(&mut self, e: BytesStart<'e>) -> Result<BytesStart<'e>> {
        let mut needs_strip = false;
        for attr in e.attributes() {
            let attr = attr.map_err(|err| XmlError::malformed(self.source, self.position, err))?;
            if self.is_stripped(&attr) {
                needs_strip = true;
                break;
            }
        }
        if !needs_strip {
            return Ok(e);
        }

        let mut stripped = e.to_owned();
        stripped.clear_attributes();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| XmlError::malformed(self.source, self.position, err))?;
            if self.is_stripped(&attr) {
                self.stats.attributes_stripped += 1;
            } else {
                stripped.push_attribute(attr);
            }
        }
        Ok(stripped)
    }

    fn is_stripped(&self, attr: &Attribute<'_>) -> bool {
        // Namespace declarations are never stripped
        !attr.key.as_ref().starts_with(b"xmlns")
            && self
                .rules
                .elements
                .is_stripped_attribute(attr.key.local_name().as_ref())
    }

    fn emit_gated(&mut self, event: Event<'_>) -> Result<()> {
        if self.context.suppresses_content() {
            self.stats.events_suppressed += 1;
            return Ok(());
        }
        self.emit(event)
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        let sink = self.current_sink();
        self.emit_into(sink, event)
    }

    fn current_sink(&self) -> Sink {
        self.sink_below(self.scopes.len())
    }

    fn sink_below(&self, idx: usize) -> Sink {
        match self.scopes.holding_below(idx) {
            Some(holder) => Sink::Scope(holder),
            None => Sink::Output,
        }
    }

    fn emit_into(&mut self, sink: Sink, event: Event<'_>) -> Result<()> {
        match sink {
            Sink::Output => self
                .writer
                .write_event(event)
                .map_err(|e| XmlError::write_failed(self.source, e).into()),
            Sink::Scope(idx) => {
                self.scopes.get_mut(idx).pending.push(event.into_owned());
                Ok(())
            }
        }
    }

    /// Releases every scope still holding an identifier and flushes
    fn finish(mut self) -> Result<DocumentStats> {
        for idx in (0..self.scopes.len()).rev() {
            self.release_scope(idx)?;
        }
        self.writer
            .get_mut()
            .flush()
            .map_err(|e| XmlError::write_failed(self.source, e))?;
        Ok(self.stats)
    }
}
