mod builder;

pub use builder::{EmitError, ResponseNode};

use roxmltree::{Document, Node};

/// Namespace prefixes used by account-transfer documents, in the order they
/// are declared on the response envelope.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("exch", "http://at.dsh.cms.gov/exchange/1.0"),
    ("s", "http://niem.gov/niem/structures/2.0"),
    ("ext", "http://at.dsh.cms.gov/extension/1.0"),
    ("hix-core", "http://hix.cms.gov/0.1/hix-core"),
    ("hix-ee", "http://hix.cms.gov/0.1/hix-ee"),
    ("nc", "http://niem.gov/niem/niem-core/2.0"),
    ("hix-pm", "http://hix.cms.gov/0.1/hix-pm"),
    ("scr", "http://niem.gov/niem/domains/screening/2.1"),
];

const STATE_CODE_PATH: &str =
    "ext:TransferHeader/ext:TransferActivity/ext:RecipientTransferActivityStateCode";

pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(candidate, _)| *candidate == prefix)
        .map(|(_, uri)| *uri)
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("account-transfer document is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),
    #[error("document root is {found}, expected exch:AccountTransferRequest")]
    UnexpectedRoot { found: String },
    #[error("transfer header does not carry a recipient state code")]
    MissingStateCode,
    #[error("{element} element does not carry an identifier attribute")]
    MissingIdentifier { element: String },
}

/// Read-only view over a parsed account-transfer request.
///
/// Navigation is deliberately dumb: slash-separated paths of `prefix:local`
/// segments, resolved child-by-child against the fixed namespace table. That
/// covers every lookup the intake performs without dragging in an XPath
/// engine.
#[derive(Debug)]
pub struct TransferDocument<'input> {
    doc: Document<'input>,
}

impl<'input> TransferDocument<'input> {
    pub fn parse(raw: &'input str) -> Result<Self, DocumentError> {
        let doc = Document::parse(raw)?;
        let root = doc.root_element();
        let name = root.tag_name();
        if name.name() != "AccountTransferRequest" || name.namespace() != namespace_uri("exch") {
            return Err(DocumentError::UnexpectedRoot {
                found: name.name().to_string(),
            });
        }
        Ok(Self { doc })
    }

    pub fn root(&self) -> Node<'_, 'input> {
        self.doc.root_element()
    }

    /// Two-letter code of the state the transfer is addressed to.
    pub fn state_code(&self) -> Result<String, DocumentError> {
        find(self.root(), STATE_CODE_PATH)
            .map(inner_text)
            .ok_or(DocumentError::MissingStateCode)
    }
}

/// First element reached by walking `path` down from `start`, if any.
pub fn find<'a, 'input>(start: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    find_all(start, path).into_iter().next()
}

/// Every element reached by walking `path` down from `start`, in document
/// order. A segment with an unknown prefix matches nothing.
pub fn find_all<'a, 'input>(start: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![start];
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let Some((uri, local)) = split_segment(segment) else {
            return Vec::new();
        };
        let mut next = Vec::new();
        for node in current {
            next.extend(node.children().filter(|child| {
                child.is_element()
                    && child.tag_name().name() == local
                    && child.tag_name().namespace() == uri
            }));
        }
        current = next;
    }
    current
}

/// Attribute value matched by local name, ignoring any namespace prefix.
/// Transfer documents mark identifiers as both `id` and `s:id`.
pub fn attribute<'a>(node: Node<'a, '_>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attribute| attribute.name() == local)
        .map(|attribute| attribute.value())
}

/// Concatenated text of every descendant text node.
pub fn inner_text(node: Node<'_, '_>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            text.push_str(descendant.text().unwrap_or_default());
        }
    }
    text
}

fn split_segment(segment: &str) -> Option<(Option<&'static str>, &str)> {
    match segment.split_once(':') {
        Some((prefix, local)) => namespace_uri(prefix).map(|uri| (Some(uri), local)),
        None => Some((None, segment)),
    }
}
