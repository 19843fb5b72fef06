//! Arena-based navigation over a resolved STAC tree.
//!
//! STAC's reciprocal `parent`/`child`/`root` links naturally form a cyclic
//! object graph. Rather than give `Link`/`Asset` an owning `target` field
//! (which `stac` deliberately does not have), a resolved subtree is held
//! here as a [Tree]: a flat arena of [Node]s, each pointing at others by
//! [NodeId] — an index, never an owning reference. A link is "resolved"
//! once its owning node has a `(link_index, NodeId)` entry in
//! [Node::children].

use crate::backend::Backend;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use stac::href::{make_absolute, make_relative};
use stac::{Asset, Assets, Bbox, Extent, Item, Link, SpatialExtent, TemporalExtent, Value};
use stac_io::{Readable, Writable};
use std::collections::HashSet;
use std::io::{Cursor, Read};
use tracing::warn;

/// An index into a [Tree]'s arena. Never an owning reference.
pub type NodeId = usize;

/// One resolved STAC object within a [Tree].
#[derive(Debug)]
pub struct Node {
    /// The object itself.
    pub value: Value,

    /// The resolved parent, if this node's `parent` link has been followed.
    pub parent: Option<NodeId>,

    /// Resolved `child`/`item` links, as `(index into value.links(), NodeId)`.
    pub children: Vec<(usize, NodeId)>,

    /// Assets not yet persisted at their current `href`, keyed by asset
    /// key, mapping to the href their bytes should be streamed from on
    /// the next [save]. Populated by [relocate]; empty for objects loaded
    /// from their already-committed location.
    pub pending_assets: Vec<(String, String)>,
}

/// A flat arena of resolved STAC objects.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Tree {
        Tree::default()
    }

    /// Inserts a bare node, returning its id.
    pub fn insert(&mut self, value: Value) -> NodeId {
        self.nodes.push(Node {
            value,
            parent: None,
            children: Vec::new(),
            pending_assets: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Returns a reference to a node.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}

/// One entry of a computed extent: a bbox plus a `[start, end]` interval.
#[derive(Debug, Clone, Copy)]
pub struct ExtentEntry {
    /// The spatial bbox.
    pub bbox: Bbox,
    /// The temporal interval.
    pub interval: [Option<DateTime<Utc>>; 2],
}

/// Every asset on `value`, regardless of whether it's an Item or a
/// Collection (a Catalog has none).
fn assets_mut(value: &mut Value) -> Box<dyn Iterator<Item = &mut Asset> + '_> {
    match value {
        Value::Item(item) => Box::new(item.assets.values_mut()),
        Value::Collection(collection) => Box::new(collection.assets.values_mut()),
        Value::Catalog(_) => Box::new(std::iter::empty()),
    }
}

/// Loads the object at `href` into `tree`, returning its [NodeId].
///
/// Promotes every link href to absolute form by joining with `href`
/// (`spec.md` §4.2) and sets the object's `self_href`. If
/// `resolve_descendants`, recursively follows `child`/`item` links.
///
/// `strict` controls what happens when a descendant fails to resolve: if
/// `true`, the error propagates (used when loading the product being
/// cataloged, which must come in whole); if `false`, the link is dropped
/// and a warning logged (used everywhere else, e.g. lazy navigation during
/// `search`).
pub fn load(
    tree: &mut Tree,
    href: &str,
    io: &dyn Readable,
    resolve_descendants: bool,
    strict: bool,
) -> Result<NodeId> {
    load_inner(tree, href, io, resolve_descendants, strict, &mut HashSet::new())
}

fn load_inner(
    tree: &mut Tree,
    href: &str,
    io: &dyn Readable,
    resolve_descendants: bool,
    strict: bool,
    visiting: &mut HashSet<String>,
) -> Result<NodeId> {
    if !visiting.insert(href.to_string()) {
        return Err(Error::StacObject(format!("cycle detected at {href}")));
    }
    let json = io.get(href)?;
    let mut value: Value = serde_json::from_value(json).map_err(stac::Error::from)?;
    for link in value.links_mut() {
        link.href = make_absolute(&link.href, href)?.into_owned();
    }
    for asset in assets_mut(&mut value) {
        asset.href = make_absolute(&asset.href, href)?.into_owned();
    }
    value.set_self_href(href);
    let node_id = tree.insert(value);

    if resolve_descendants {
        let structural: Vec<(usize, String)> = tree
            .get(node_id)
            .value
            .links()
            .iter()
            .enumerate()
            .filter(|(_, link)| link.is_structural_child())
            .map(|(index, link)| (index, link.href.clone()))
            .collect();
        for (index, child_href) in structural {
            match load_inner(tree, &child_href, io, true, strict, visiting) {
                Ok(child_id) => {
                    tree.get_mut(child_id).parent = Some(node_id);
                    tree.get_mut(node_id).children.push((index, child_id));
                }
                Err(error) if !strict => {
                    warn!(href = %child_href, %error, "dropping unresolved descendant link");
                }
                Err(error) => return Err(error),
            }
        }
    }
    let _ = visiting.remove(href);
    Ok(node_id)
}

/// Lazily resolves every structural link on `node` that isn't already in
/// its `children`, dropping (with a warning) any that fail to load.
fn ensure_children_loaded(tree: &mut Tree, node: NodeId, io: &dyn Readable) -> Result<()> {
    let resolved: HashSet<usize> = tree.get(node).children.iter().map(|(index, _)| *index).collect();
    let pending: Vec<(usize, String)> = tree
        .get(node)
        .value
        .links()
        .iter()
        .enumerate()
        .filter(|(index, link)| link.is_structural_child() && !resolved.contains(index))
        .map(|(index, link)| (index, link.href.clone()))
        .collect();
    for (index, href) in pending {
        match load(tree, &href, io, false, false) {
            Ok(child_id) => {
                tree.get_mut(child_id).parent = Some(node);
                tree.get_mut(node).children.push((index, child_id));
            }
            Err(error) => {
                warn!(href = %href, %error, "dropping unresolved link during traversal");
            }
        }
    }
    Ok(())
}

/// Follows `node`'s `parent` link, loading and caching the parent if it
/// isn't already resolved. Returns `None` at the root.
pub fn load_parent(tree: &mut Tree, node: NodeId, io: &dyn Readable) -> Result<Option<NodeId>> {
    if let Some(parent) = tree.get(node).parent {
        return Ok(Some(parent));
    }
    let parent_href = tree
        .get(node)
        .value
        .links()
        .iter()
        .find(|link| link.is_parent())
        .map(|link| link.href.clone());
    match parent_href {
        None => Ok(None),
        Some(href) => {
            let parent_id = load(tree, &href, io, false, false)?;
            tree.get_mut(node).parent = Some(parent_id);
            Ok(Some(parent_id))
        }
    }
}

/// Depth-first search for the first object with the given `id`, starting
/// at `root`, resolving links lazily as needed.
///
/// Breaks a cycle on re-visiting a `self_href`, per `spec.md` §4.2 (the
/// tree is acyclic by repository invariant, but traversal should not spin
/// forever if that invariant is ever violated).
pub fn search(tree: &mut Tree, root: NodeId, id: &str, io: &dyn Readable) -> Result<Option<NodeId>> {
    let mut visited = HashSet::new();
    search_inner(tree, root, id, io, &mut visited)
}

fn search_inner(
    tree: &mut Tree,
    node: NodeId,
    id: &str,
    io: &dyn Readable,
    visited: &mut HashSet<String>,
) -> Result<Option<NodeId>> {
    let self_href = tree.get(node).value.self_href().unwrap_or_default().to_string();
    if !visited.insert(self_href) {
        return Ok(None);
    }
    if tree.get(node).value.id() == id {
        return Ok(Some(node));
    }
    ensure_children_loaded(tree, node, io)?;
    let children: Vec<NodeId> = tree.get(node).children.iter().map(|(_, id)| *id).collect();
    for child in children {
        if let Some(found) = search_inner(tree, child, id, io, visited)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Adds reciprocal `parent`/`child` (or `item`) links between `child` and
/// `parent`, and copies `parent`'s effective root href onto `child`.
///
/// Exactly one `parent` link ends up on `child`; the `child`/`item` link
/// is appended to `parent` only if not already present (`spec.md` §4.2).
pub fn set_parent(tree: &mut Tree, child: NodeId, parent: NodeId) {
    let parent_href = tree.get(parent).value.self_href().unwrap_or_default().to_string();
    let root_href = tree
        .get(parent)
        .value
        .links()
        .iter()
        .find(|link| link.is_root())
        .map(|link| link.href.clone())
        .unwrap_or_else(|| parent_href.clone());
    let child_href = tree.get(child).value.self_href().unwrap_or_default().to_string();
    let rel: fn(&str) -> Link = if matches!(tree.get(child).value, Value::Item(_)) {
        Link::item
    } else {
        Link::child
    };

    {
        let node = tree.get_mut(child);
        node.value.links_mut().retain(|link| !(link.is_parent() || link.is_root()));
        node.value.links_mut().push(Link::parent(&parent_href));
        node.value.links_mut().push(Link::root(&root_href));
        node.parent = Some(parent);
    }

    let existing_index = tree
        .get(parent)
        .value
        .links()
        .iter()
        .position(|link| link.is_structural_child() && link.href == child_href);
    let index = match existing_index {
        Some(index) => index,
        None => {
            let node = tree.get_mut(parent);
            node.value.links_mut().push(rel(&child_href));
            node.value.links().len() - 1
        }
    };
    let node = tree.get_mut(parent);
    node.children.retain(|(_, id)| *id != child);
    node.children.push((index, child));
}

/// Removes `child`'s `parent`/`root` links and its owner's reciprocal
/// `child`/`item` link.
pub fn unset_parent(tree: &mut Tree, child: NodeId) {
    if let Some(parent) = tree.get(child).parent {
        let child_href = tree.get(child).value.self_href().map(str::to_string);
        let node = tree.get_mut(parent);
        if let Some(href) = &child_href {
            node.value
                .links_mut()
                .retain(|link| !(link.is_structural_child() && &link.href == href));
        }
        node.children.retain(|(_, id)| *id != child);
    }
    let node = tree.get_mut(child);
    node.value.links_mut().retain(|link| !(link.is_parent() || link.is_root()));
    node.parent = None;
}

fn layout_dir(parent_dir: &str, id: &str) -> String {
    format!("{}/{}", parent_dir.trim_end_matches('/'), id)
}

fn layout_href(dir: &str, value: &Value) -> String {
    match value {
        Value::Item(item) => format!("{dir}/{}.json", item.id),
        Value::Collection(_) => format!("{dir}/collection.json"),
        Value::Catalog(_) => format!("{dir}/catalog.json"),
    }
}

/// Rewrites `node`'s `self_href`, asset hrefs, and every structural link
/// in its subtree to the best-practices layout rooted at `parent_dir`
/// (`spec.md` §6): `<dir>/<id>/catalog.json`, `.../collection.json`, or
/// `.../<id>.json`, with assets alongside under the same directory.
///
/// Any asset whose bytes aren't already at its new href is recorded in
/// [Node::pending_assets], keyed by the href to stream them in from —
/// this is how a freshly-ingested product's external asset files get
/// pulled into the repository on the next [save].
pub fn relocate(tree: &mut Tree, node: NodeId, parent_dir: &str, root_href: &str) -> Result<()> {
    let id = tree.get(node).value.id().to_string();
    let dir = layout_dir(parent_dir, &id);
    let new_href = layout_href(&dir, &tree.get(node).value);

    relocate_assets(tree, node, &dir)?;

    {
        let n = tree.get_mut(node);
        n.value.set_self_href(&new_href);
        n.value.links_mut().retain(|link| !(link.is_self() || link.is_root()));
        n.value.links_mut().push(Link::self_(&new_href));
        n.value.links_mut().push(Link::root(root_href));
    }

    let children = tree.get(node).children.clone();
    for (index, child) in children {
        relocate(tree, child, &dir, root_href)?;
        let child_href = tree.get(child).value.self_href().unwrap_or_default().to_string();
        if let Some(link) = tree.get_mut(node).value.links_mut().get_mut(index) {
            link.href = child_href.clone();
        }
        let child_node = tree.get_mut(child);
        child_node.value.links_mut().retain(|link| !link.is_parent());
        child_node.value.links_mut().push(Link::parent(&new_href));
    }
    Ok(())
}

/// Rewrites `node`'s subtree to the best-practices layout rooted directly
/// at `dir` (`Commit::export`'s use of §4.3 `export(dir)`), unlike
/// [relocate], which additionally nests `node` itself under a fresh
/// `<dir>/<id>` directory when grafting it under an existing parent.
/// `node` becomes its own root (`root` link points at itself, any existing
/// `parent` link is dropped).
pub fn export(tree: &mut Tree, node: NodeId, dir: &str) -> Result<()> {
    let new_href = layout_href(dir, &tree.get(node).value);
    relocate_assets(tree, node, dir)?;

    {
        let n = tree.get_mut(node);
        n.value
            .links_mut()
            .retain(|link| !(link.is_self() || link.is_root() || link.is_parent()));
        n.value.set_self_href(&new_href);
        n.value.links_mut().push(Link::self_(&new_href));
        n.value.links_mut().push(Link::root(&new_href));
    }

    let children = tree.get(node).children.clone();
    for (index, child) in children {
        relocate(tree, child, dir, &new_href)?;
        let child_href = tree.get(child).value.self_href().unwrap_or_default().to_string();
        if let Some(link) = tree.get_mut(node).value.links_mut().get_mut(index) {
            link.href = child_href.clone();
        }
        let child_node = tree.get_mut(child);
        child_node.value.links_mut().retain(|link| !link.is_parent());
        child_node.value.links_mut().push(Link::parent(&new_href));
    }
    Ok(())
}

fn relocate_assets(tree: &mut Tree, node: NodeId, dir: &str) -> Result<()> {
    let old_href = tree.get(node).value.self_href().map(str::to_string);
    let keys: Vec<String> = match &tree.get(node).value {
        Value::Item(item) => item.assets.keys().cloned().collect(),
        Value::Collection(collection) => collection.assets.keys().cloned().collect(),
        Value::Catalog(_) => Vec::new(),
    };
    for key in keys {
        let current_href = match &tree.get(node).value {
            Value::Item(item) => item.assets.get(&key).map(|asset| asset.href.clone()),
            Value::Collection(collection) => collection.assets.get(&key).map(|asset| asset.href.clone()),
            Value::Catalog(_) => None,
        };
        let Some(current_href) = current_href else {
            continue;
        };
        let source = match &old_href {
            Some(base) => make_absolute(&current_href, base)?.into_owned(),
            None => current_href.clone(),
        };
        let filename = source.rsplit('/').next().unwrap_or(&current_href).to_string();
        let new_href = format!("{dir}/{filename}");
        let node_mut = tree.get_mut(node);
        if source != new_href {
            node_mut.pending_assets.push((key.clone(), source));
        }
        match &mut node_mut.value {
            Value::Item(item) => {
                if let Some(asset) = item.assets.get_mut(&key) {
                    asset.href = new_href;
                }
            }
            Value::Collection(collection) => {
                if let Some(asset) = collection.assets.get_mut(&key) {
                    asset.href = new_href;
                }
            }
            Value::Catalog(_) => {}
        }
    }
    Ok(())
}

/// Writes `node` and every resolved descendant via `io`, streaming in any
/// pending (not-yet-persisted) asset bytes first (`spec.md` §4.2 `save`).
///
/// Descendants are written before their parent, so a reader can never
/// observe a parent pointing at a missing child after `commit`. Link and
/// asset hrefs are absolute in memory but relativized to the owning
/// object's own directory before being serialized, matching the
/// self-contained-catalog layout on disk (`spec.md` Glossary, filesystem
/// layout rule).
///
/// `lfs` is consulted after each asset write so size-based backend
/// policies (Git LFS) can act on it; `None` for writes outside a
/// backend's own working tree (`Commit::export`).
pub fn save(tree: &Tree, node: NodeId, io: &dyn Writable, lfs: Option<&Backend>) -> Result<()> {
    for (_, child) in &tree.get(node).children {
        save(tree, *child, io, lfs)?;
    }
    let n = tree.get(node);
    let href = n.value.self_href().ok_or(stac::Error::NoHref)?.to_string();
    for (key, source_href) in &n.pending_assets {
        let target_href = match &n.value {
            Value::Item(item) => item.assets.get(key).map(|asset| asset.href.clone()),
            Value::Collection(collection) => collection.assets.get(key).map(|asset| asset.href.clone()),
            Value::Catalog(_) => None,
        };
        if let Some(target_href) = target_href {
            let mut reader = io.get_asset(source_href)?;
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            let size = bytes.len() as u64;
            io.put_asset(&target_href, &mut Cursor::new(bytes))?;
            if let Some(backend) = lfs {
                backend.record_asset_write(&target_href, size)?;
            }
        }
    }
    let mut value = n.value.clone();
    relativize(&mut value, &href);
    let json = serde_json::to_value(&value).map_err(stac::Error::from)?;
    io.put(&href, &json)?;
    Ok(())
}

/// Relativizes `href` against `self_href`. A self/root link pointing at
/// `self_href` itself would otherwise come back empty (`make_relative`'s
/// `Url`-derived convention for "this exact document"); fall back to
/// `./<filename>`, the usual STAC form for a same-directory link.
fn relative_href(href: &str, self_href: &str) -> String {
    let relative = make_relative(href, self_href);
    if relative.is_empty() {
        match href.rsplit('/').next() {
            Some(name) if !name.is_empty() => format!("./{name}"),
            _ => relative,
        }
    } else {
        relative
    }
}

/// Rewrites every link href and asset href on `value` to be relative to
/// `self_href`, the form they're stored in on disk; in-memory hrefs stay
/// absolute (set by [load_inner]/[relocate]) so navigation never needs to
/// re-resolve them against a base.
fn relativize(value: &mut Value, self_href: &str) {
    for link in value.links_mut() {
        link.href = relative_href(&link.href, self_href);
    }
    for asset in assets_mut(value) {
        asset.href = relative_href(&asset.href, self_href);
    }
}

/// Recursively deletes `node`'s resolved descendants, then its in-scope
/// assets, then the object itself (`spec.md` §4.2 `delete`).
///
/// An out-of-scope asset delete is logged and skipped rather than
/// propagated, matching `SPEC_FULL.md` §3's decision for out-of-scope hrefs.
pub fn delete(tree: &Tree, node: NodeId, io: &dyn Writable) -> Result<()> {
    for (_, child) in &tree.get(node).children {
        delete(tree, *child, io)?;
    }
    let n = tree.get(node);
    let asset_hrefs: Vec<String> = match &n.value {
        Value::Item(item) => item.assets().values().map(|asset| asset.href.clone()).collect(),
        Value::Collection(collection) => collection.assets().values().map(|asset| asset.href.clone()).collect(),
        Value::Catalog(_) => Vec::new(),
    };
    for href in asset_hrefs {
        if let Err(error) = io.delete(&href) {
            warn!(href = %href, %error, "skipping out-of-scope asset during delete");
        }
    }
    if let Some(href) = n.value.self_href() {
        io.delete(href)?;
    }
    Ok(())
}

fn item_extent(item: &Item) -> Result<ExtentEntry> {
    let bbox = match item.bbox {
        Some(bbox) => bbox,
        None => match &item.geometry {
            Some(geometry) => Bbox::from_geometry(geometry)?,
            None => {
                return Err(Error::StacObject(format!(
                    "item {} has no bbox or geometry to derive an extent from",
                    item.id
                )));
            }
        },
    };
    let (start, end) = item.datetimes();
    if start.is_none() && end.is_none() {
        return Err(Error::StacObject(format!(
            "item {} has no datetime to derive an extent from",
            item.id
        )));
    }
    Ok(ExtentEntry {
        bbox,
        interval: [start, end],
    })
}

fn union_entries(entries: &[ExtentEntry]) -> Option<ExtentEntry> {
    let mut iter = entries.iter();
    let first = iter.next()?;
    let mut bbox = first.bbox;
    let mut start = first.interval[0];
    let mut end = first.interval[1];
    for entry in iter {
        bbox.update(entry.bbox);
        if let Some(s) = entry.interval[0] {
            start = Some(start.map_or(s, |current| current.min(s)));
        }
        if let Some(e) = entry.interval[1] {
            end = Some(end.map_or(e, |current| current.max(e)));
        }
    }
    Some(ExtentEntry {
        bbox,
        interval: [start, end],
    })
}

/// Recursively gathers the extent `node` contributes to an ancestor's
/// rollup: an item's own derived extent, or the union of a catalog's/
/// collection's resolved children. An empty catalog contributes nothing
/// (`Ok(None)`); an empty collection is a hard error, since it cannot be
/// saved without a valid `extent` itself.
fn gather_extent(tree: &mut Tree, node: NodeId, io: &dyn Readable) -> Result<Option<ExtentEntry>> {
    ensure_children_loaded(tree, node, io)?;
    match &tree.get(node).value {
        Value::Item(item) => Ok(Some(item_extent(item)?)),
        Value::Collection(_) | Value::Catalog(_) => {
            let is_collection = matches!(tree.get(node).value, Value::Collection(_));
            let children: Vec<NodeId> = tree.get(node).children.iter().map(|(_, id)| *id).collect();
            let mut entries = Vec::new();
            for child in children {
                if let Some(entry) = gather_extent(tree, child, io)? {
                    entries.push(entry);
                }
            }
            match union_entries(&entries) {
                Some(entry) => Ok(Some(entry)),
                None if is_collection => Err(Error::StacObject(format!(
                    "collection {} has no descendants to derive an extent from",
                    tree.get(node).value.id()
                ))),
                None => Ok(None),
            }
        }
    }
}

/// Recomputes the Collection at `node`'s extent from its direct children,
/// returning `[overall, child_1, child_2, …]` in link order (`spec.md`
/// §4.2). `node` must hold a [Value::Collection].
pub fn compute_extent(tree: &mut Tree, node: NodeId, io: &dyn Readable) -> Result<Vec<ExtentEntry>> {
    ensure_children_loaded(tree, node, io)?;
    let children: Vec<NodeId> = tree.get(node).children.iter().map(|(_, id)| *id).collect();
    let mut per_child = Vec::new();
    for child in children {
        if let Some(entry) = gather_extent(tree, child, io)? {
            per_child.push(entry);
        }
    }
    let overall = union_entries(&per_child).ok_or_else(|| {
        Error::StacObject(format!(
            "collection {} has no descendants to derive an extent from",
            tree.get(node).value.id()
        ))
    })?;
    let mut result = vec![overall];
    result.extend(per_child);
    Ok(result)
}

/// Applies a result of [compute_extent] to the Collection at `node`.
///
/// A no-op if `node` doesn't hold a Collection.
pub fn apply_extent(tree: &mut Tree, node: NodeId, entries: &[ExtentEntry]) {
    if let Some(collection) = tree.get_mut(node).value.as_collection_mut() {
        collection.extent = Extent {
            spatial: SpatialExtent {
                bbox: entries.iter().map(|entry| entry.bbox).collect(),
            },
            temporal: TemporalExtent {
                interval: entries.iter().map(|entry| entry.interval).collect(),
            },
            additional_fields: collection.extent.additional_fields.clone(),
        };
    }
}

/// Deep-copies the subtree rooted at `node` in `src` into `dest`, returning
/// the new root's id. `node`'s `parent` is left unset on the copy; callers
/// graft a freshly-loaded product into a repository's tree this way before
/// calling [set_parent], since the two trees are separate arenas until then.
pub fn graft(dest: &mut Tree, src: &Tree, node: NodeId) -> NodeId {
    let source = src.get(node);
    let new_id = dest.insert(source.value.clone());
    dest.get_mut(new_id).pending_assets = source.pending_assets.clone();
    for (index, child) in &source.children {
        let new_child = graft(dest, src, *child);
        dest.get_mut(new_child).parent = Some(new_id);
        dest.get_mut(new_id).children.push((*index, new_child));
    }
    new_id
}

/// Reads an object's declared version (`spec.md` §4.2 `get_version`):
/// `properties.version` for an Item, `version` for a Collection/Catalog.
/// `None` if absent.
pub fn get_version(value: &Value) -> Option<String> {
    match value {
        Value::Item(item) => item.version_field().map(str::to_string),
        Value::Collection(collection) => stac::Fields::field::<String>(collection, "version").ok().flatten(),
        Value::Catalog(catalog) => stac::Fields::field::<String>(catalog, "version").ok().flatten(),
    }
}
