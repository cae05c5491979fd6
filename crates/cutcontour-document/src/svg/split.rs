// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layer splitting — separates the tagged cut region of a drawing from the
// printable artwork so each can be exported on its own.
//
// A tagged element is taken whole: its descendants belong to the cut region
// and are never evaluated separately. Both variants keep the root element
// (size, viewBox) and all non-drawing elements such as <defs>, so they export
// to the same page geometry.

use cutcontour_core::RegionTag;
use cutcontour_core::error::Result;
use tracing::{debug, info, instrument};

use super::tree::{Element, Node, SvgDocument};

/// Two independent drawings produced from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSplit {
    /// Only the tagged elements (and the groups that contain them).
    pub cut_svg: String,
    /// Everything except the tagged elements.
    pub print_svg: String,
    /// Number of tagged elements found.
    pub cut_elements: usize,
}

/// Split `svg` on `tag`.
///
/// Returns `Ok(None)` when no element matches, meaning the caller should
/// convert the drawing as a single layer. Fails when the drawing is not
/// well-formed XML.
#[instrument(skip_all, fields(svg_len = svg.len()))]
pub fn split_layers(svg: &str, tag: &RegionTag) -> Result<Option<LayerSplit>> {
    let source = SvgDocument::parse(svg)?;
    let Some(root) = source.root() else {
        return Ok(None);
    };

    let cut_elements = count_tagged(root, tag);
    if cut_elements == 0 {
        debug!("no element carries the cut region tag");
        return Ok(None);
    }

    let mut cut = source.clone();
    let mut print = source;
    if let Some(root) = cut.root_mut() {
        retain_tagged(root, tag);
    }
    if let Some(root) = print.root_mut() {
        remove_tagged(root, tag);
    }

    info!(cut_elements, "drawing split into cut and print layers");
    Ok(Some(LayerSplit {
        cut_svg: cut.to_xml()?,
        print_svg: print.to_xml()?,
        cut_elements,
    }))
}

fn is_tagged(element: &Element, tag: &RegionTag) -> bool {
    element.names().any(|name| tag.matches(&name))
}

/// Tagged elements below `parent`, not descending into tagged subtrees.
fn count_tagged(parent: &Element, tag: &RegionTag) -> usize {
    child_elements(parent)
        .filter(|child| !child.is_structural())
        .map(|child| {
            if is_tagged(child, tag) {
                1
            } else {
                count_tagged(child, tag)
            }
        })
        .sum()
}

fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(|node| match node {
        Node::Element(element) => Some(element),
        Node::Other(_) => None,
    })
}

/// Keep tagged subtrees and the groups leading to them; make them visible.
fn retain_tagged(parent: &mut Element, tag: &RegionTag) {
    parent.children.retain_mut(|node| match node {
        Node::Other(_) => true,
        Node::Element(child) if child.is_structural() => true,
        Node::Element(child) if is_tagged(child, tag) => {
            child.force_visible();
            true
        }
        Node::Element(child) if count_tagged(child, tag) > 0 => {
            child.force_visible();
            retain_tagged(child, tag);
            true
        }
        Node::Element(_) => false,
    });
}

/// Drop every tagged subtree reachable from `parent`.
fn remove_tagged(parent: &mut Element, tag: &RegionTag) {
    parent.children.retain_mut(|node| match node {
        Node::Other(_) => true,
        Node::Element(child) if child.is_structural() => true,
        Node::Element(child) if is_tagged(child, tag) => false,
        Node::Element(child) => {
            remove_tagged(child, tag);
            true
        }
    });
}
