//! WordprocessingML navigation helpers.
//!
//! DOCX parts qualify every element with the `w:` namespace; these helpers
//! match on local names only.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use normas_organizer::extract::xml::get_tag_name;
///
/// let xml = r#"<w:document xmlns:w="urn:w"><w:body/></w:document>"#;
/// let doc = Document::parse(xml).unwrap();
/// let body = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(body), "body");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

#[must_use]
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find the first child element with the given local name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, tag))
}

/// Find all child elements with the given local name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| has_tag(*child, tag))
}

/// Follow a `/`-separated path of child local names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use normas_organizer::extract::xml::find_by_path;
///
/// let xml = r#"<w:p xmlns:w="urn:w"><w:pPr><w:jc w:val="center"/></w:pPr></w:p>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert!(find_by_path(doc.root_element(), "pPr/jc").is_some());
/// assert!(find_by_path(doc.root_element(), "pPr/b").is_none());
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, tag| find_child(current, tag))
}

/// Attribute value by local name (`w:val` → `val`).
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == name)
        .map(|attr| attr.value())
}

/// Toggle properties (`w:b`, `w:caps`) are on unless `w:val` switches them off.
#[must_use]
pub fn is_toggle_on(node: Node<'_, '_>) -> bool {
    !matches!(
        get_attribute(node, "val"),
        Some("0" | "false" | "off" | "none")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_toggle_properties() {
        let xml = r#"<w:rPr xmlns:w="urn:w"><w:b/><w:i w:val="0"/><w:caps w:val="true"/></w:rPr>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        assert!(is_toggle_on(find_child(root, "b").unwrap()));
        assert!(!is_toggle_on(find_child(root, "i").unwrap()));
        assert!(is_toggle_on(find_child(root, "caps").unwrap()));
    }

    #[test]
    fn test_find_children_by_local_name() {
        let xml = r#"<w:tr xmlns:w="urn:w"><w:tc/><w:tc/><w:trPr/></w:tr>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(find_children(doc.root_element(), "tc").count(), 2);
    }
}
