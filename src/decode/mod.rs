//! Decoding of form-instance documents.
//!
//! The walk is a single pass over the XML event stream with an explicit
//! element-path stack. Repeating groups are recognized by tag naming
//! convention only: a direct child of `Values` whose tag ends in a
//! decimal digit run is `<Stem><RowIndex>`; everything else under
//! `Values` is a scalar top-level field. Unresolved group stems and
//! unknown attributes are logged and skipped — the platform's documents
//! legitimately carry groups this engine does not consume, and its
//! schema drifts.

pub mod reconcile;
pub mod registry;
pub mod store;

pub use registry::{Resolved, RowGroup, RowGroupType, resolve};
pub use store::RowStore;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::core::BillingError;
use crate::normalize::trailing_digits;

use registry::AliasGroup;

/// Timestamp formats observed in the `Posted` header field.
const POSTED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// One decoded form instance: routing header fields, the scalar values,
/// and the row-indexed group store.
#[derive(Debug, Clone, Default)]
pub struct DecodedForm {
    /// Form family that produced the instance (`Header/Flow/FamilyID`).
    pub family_id: String,
    /// Source instance id (`Header/FlowInstanceID`).
    pub flow_instance_id: String,
    /// Submission timestamp, when the export carried a parseable one.
    pub posted: Option<NaiveDateTime>,
    /// Scalar fields under `Values`, keyed by tag name with the first
    /// character lower-cased.
    pub scalars: BTreeMap<String, String>,
    /// Populated repeating groups.
    pub rows: RowStore,
}

impl DecodedForm {
    /// Scalar field by normalized key, `None` when the form omitted it.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.scalars.get(key).map(String::as_str)
    }
}

/// A group element currently being populated.
#[derive(Debug)]
struct PendingGroup {
    /// Full tag as it appeared, to match the closing element.
    tag: String,
    index: u32,
    builder: GroupBuilder,
}

#[derive(Debug)]
enum GroupBuilder {
    Canonical(RowGroup),
    Alias(AliasGroup),
}

impl GroupBuilder {
    fn set(&mut self, attr: &str, value: &str) -> bool {
        match self {
            Self::Canonical(group) => group.set(attr, value),
            Self::Alias(group) => group.set(attr, value),
        }
    }

    fn finish(self) -> RowGroup {
        match self {
            Self::Canonical(group) => group,
            Self::Alias(group) => group.consolidate(),
        }
    }
}

/// Decode one form-instance document.
///
/// Verifies the declared default namespace against `expected_namespace`
/// (mismatch is fatal — the producer sent the wrong document type), then
/// walks the tree once, populating a fresh [`DecodedForm`]. A document
/// that is not well-formed XML, is not valid UTF-8, or carries no
/// namespace declaration at all — the platform occasionally returns an
/// HTML error page in place of the export — fails with
/// [`BillingError::MalformedDocument`]. An absent or empty `Values`
/// subtree is not an error here; reconciliation reports it as missing
/// data downstream.
pub fn decode_form_instance(
    bytes: &[u8],
    expected_namespace: &str,
) -> Result<DecodedForm, BillingError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| BillingError::MalformedDocument(format!("document is not UTF-8: {e}")))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut form = DecodedForm::default();
    let mut path: Vec<String> = Vec::new();
    let mut root_seen = false;
    let mut pending: Option<PendingGroup> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.name().as_ref());
                if !root_seen {
                    check_namespace(e, &name, expected_namespace)?;
                    root_seen = true;
                } else if path.len() == 2 && path[1] == "Values" {
                    pending = open_group(&name);
                }
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e.name().as_ref());
                if !root_seen {
                    check_namespace(e, &name, expected_namespace)?;
                    root_seen = true;
                } else if path.len() == 2 && path[1] == "Values" {
                    // A childless group still counts as a populated
                    // (empty) occurrence; a childless scalar is absent.
                    if let Some(group) = open_group(&name) {
                        form.rows.insert(group.index, group.builder.finish());
                    }
                }
                // An empty attribute element inside a group leaves the
                // attribute unset.
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| BillingError::MalformedDocument(format!("bad text content: {e}")))?
                    .to_string();
                if !text.is_empty() {
                    route_text(&mut form, &mut pending, &path, &text);
                }
            }
            Ok(Event::End(_)) => {
                let ended = path.pop().unwrap_or_default();
                // Closing a direct child of Values finalizes the group
                // being populated, if any.
                if path.len() == 2
                    && path[1] == "Values"
                    && pending.as_ref().is_some_and(|p| p.tag == ended)
                {
                    if let Some(group) = pending.take() {
                        form.rows.insert(group.index, group.builder.finish());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BillingError::MalformedDocument(format!(
                    "XML parse error: {e}"
                )));
            }
            Ok(_) => {}
        }
    }

    if !root_seen {
        return Err(BillingError::MalformedDocument(
            "document contains no root element".into(),
        ));
    }
    Ok(form)
}

/// Verify the root's declared default namespace.
fn check_namespace(
    root: &BytesStart<'_>,
    root_name: &str,
    expected: &str,
) -> Result<(), BillingError> {
    let mut declared: Option<String> = None;
    for attr in root.attributes().flatten() {
        if attr.key.as_ref() == b"xmlns" {
            declared = Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    match declared {
        None => Err(BillingError::MalformedDocument(format!(
            "root element <{root_name}> declares no namespace"
        ))),
        Some(found) if found != expected => Err(BillingError::NamespaceMismatch {
            expected: expected.to_string(),
            found,
        }),
        Some(_) => Ok(()),
    }
}

/// Recognize a direct child of `Values` as a repeating group and start
/// populating it. Non-group tags and unresolved stems yield `None`.
fn open_group(tag: &str) -> Option<PendingGroup> {
    let (type_key, index) = split_group_tag(tag)?;
    if index == 0 {
        warn!(tag, "row index 0 in group tag; skipping (indices are 1-based)");
        return None;
    }
    let builder = match resolve(&type_key) {
        Some(Resolved::Canonical(group_type)) => GroupBuilder::Canonical(group_type.new_group()),
        Some(Resolved::Alias(alias)) => GroupBuilder::Alias(alias.new_group()),
        None => {
            debug!(tag, %type_key, "unresolved row-group type; skipping");
            return None;
        }
    };
    Some(PendingGroup {
        tag: tag.to_string(),
        index,
        builder,
    })
}

/// Route a text node by its element path.
fn route_text(form: &mut DecodedForm, pending: &mut Option<PendingGroup>, path: &[String], text: &str) {
    match path {
        [_, header, flow, family]
            if header == "Header" && flow == "Flow" && family == "FamilyID" =>
        {
            form.family_id = text.to_string();
        }
        [_, header, instance] if header == "Header" && instance == "FlowInstanceID" => {
            form.flow_instance_id = text.to_string();
        }
        [_, header, posted] if header == "Header" && posted == "Posted" => {
            form.posted = parse_posted(text);
            if form.posted.is_none() {
                debug!(posted = text, "unparseable Posted timestamp; leaving unset");
            }
        }
        [_, values, tag] if values == "Values" => {
            // Stray text directly inside a group element is not a scalar.
            if split_group_tag(tag).is_none() {
                form.scalars.insert(lower_first(tag), text.to_string());
            }
        }
        [_, values, group_tag, attr] if values == "Values" => {
            let Some(p) = pending.as_mut() else { return };
            if p.tag != *group_tag {
                return;
            }
            let key = attr_key(attr);
            if !p.builder.set(&key, text) {
                warn!(
                    group = %group_tag,
                    attribute = %key,
                    "unknown attribute in row group; ignoring"
                );
            }
        }
        _ => {}
    }
}

/// Split `<Stem><DecimalIndex>` into the registry type key and the row
/// index. Tags without a trailing digit run (or with nothing but
/// digits) are not groups.
fn split_group_tag(tag: &str) -> Option<(String, u32)> {
    let digits = trailing_digits(tag)?;
    let stem = &tag[..tag.len() - digits.len()];
    if stem.is_empty() {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((lower_first(stem), index))
}

/// Normalize an attribute tag by the same stem-stripping rule used for
/// group tags: drop any trailing digit run, lower-case the first letter.
fn attr_key(tag: &str) -> String {
    let stem = match trailing_digits(tag) {
        Some(digits) if digits.len() < tag.len() => &tag[..tag.len() - digits.len()],
        _ => tag,
    };
    lower_first(stem)
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Local tag name with any namespace prefix stripped.
fn local_name(qname: &[u8]) -> String {
    let name = String::from_utf8_lossy(qname);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

fn parse_posted(text: &str) -> Option<NaiveDateTime> {
    POSTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
