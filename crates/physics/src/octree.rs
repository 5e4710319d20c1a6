//! # Sphere Octree
//!
//! A fixed-depth octree over a registry of bounding spheres. The tree is
//! preallocated breadth-first into a flat arena, so nodes refer to each other
//! by [`NodeId`] rather than by pointer. Each sphere is stored at the
//! shallowest node whose box fully contains the sphere's AABB and none of
//! whose children does.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::PhysicsError;
use crate::types::{Aabb, Sphere, Vec3};

/// Deepest tree [`SphereIndex::build_tree`] accepts.
pub const MAX_TREE_DEPTH: u32 = 6;

/// Child octant offsets as signs of (x, y, z): the four high-y octants, then
/// the four low-y octants.
const OCTANT_SIGNS: [[f32; 3]; 8] = [
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
];

/// Index of a node in the octree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One cell of the octree.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    bounds: Aabb,
    depth: u32,
    parent: Option<NodeId>,
    children: Option<[NodeId; 8]>,
    spheres: Vec<usize>,
}

impl OctreeNode {
    fn new(bounds: Aabb, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            bounds,
            depth,
            parent,
            children: None,
            spheres: Vec::new(),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[must_use]
    pub fn lower_bound(&self) -> Vec3 {
        self.bounds.lower
    }

    #[must_use]
    pub fn upper_bound(&self) -> Vec3 {
        self.bounds.upper
    }

    /// Depth below the root, which sits at 0.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// All eight children, or `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[NodeId; 8]> {
        self.children.as_ref()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Registry indices of the spheres stored at this node.
    #[must_use]
    pub fn spheres(&self) -> &[usize] {
        &self.spheres
    }
}

/// True when all eight corners of the sphere's AABB lie inside `bounds`.
#[must_use]
pub fn sphere_fully_in_box(sphere: &Sphere, bounds: &Aabb) -> bool {
    sphere
        .aabb()
        .corners()
        .iter()
        .all(|corner| bounds.contains_point(*corner))
}

/// Number of nodes in a complete octree of the given depth.
#[must_use]
pub const fn node_count(depth: u32) -> usize {
    (8_usize.pow(depth + 1) - 1) / 7
}

/// Sphere registry plus the octree built over it.
#[derive(Debug, Clone, Default)]
pub struct SphereIndex {
    spheres: Vec<Sphere>,
    nodes: Vec<OctreeNode>,
    occupied: Vec<NodeId>,
    unplaced: Vec<usize>,
}

impl SphereIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sphere and return its index. The tree is not updated until
    /// the next [`build_tree`](Self::build_tree).
    pub fn add_sphere(&mut self, position: Vec3, radius: f32) -> usize {
        self.spheres.push(Sphere::new(position, radius));
        self.spheres.len() - 1
    }

    /// Drop every sphere and the tree built over them.
    pub fn clear_spheres(&mut self) {
        self.spheres.clear();
        self.nodes.clear();
        self.occupied.clear();
        self.unplaced.clear();
    }

    /// Rebuild the tree over a cube-like region `origin ± size` and assign
    /// every registered sphere to it.
    ///
    /// Returns the nodes holding at least one sphere, in the order they
    /// received their first sphere. At depth 0 the root holds every sphere
    /// without a containment check. Deeper trees leave spheres that do not
    /// fit the root out of every node; see [`unplaced`](Self::unplaced).
    ///
    /// # Errors
    ///
    /// [`PhysicsError::DepthTooLarge`] above [`MAX_TREE_DEPTH`] and
    /// [`PhysicsError::InvalidTreeSize`] for a non-finite or non-positive
    /// half-size. The previous tree is kept in both cases.
    pub fn build_tree(
        &mut self,
        depth: u32,
        size: Vec3,
        origin: Vec3,
    ) -> Result<&[NodeId], PhysicsError> {
        validate_tree_params(depth, size)?;

        self.nodes = subdivide(Aabb::new(origin - size, origin + size), depth);
        self.occupied.clear();
        self.unplaced.clear();

        if depth == 0 {
            let root = &mut self.nodes[NodeId::ROOT.0];
            root.spheres.extend(0..self.spheres.len());
            if !root.spheres.is_empty() {
                self.occupied.push(NodeId::ROOT);
            }
        } else {
            for sphere in 0..self.spheres.len() {
                if !self.assign_sphere(NodeId::ROOT, sphere) {
                    warn!(
                        sphere,
                        position = ?self.spheres[sphere].position,
                        radius = self.spheres[sphere].radius,
                        "sphere lies outside the octree root"
                    );
                    self.unplaced.push(sphere);
                }
            }
        }

        debug!(
            depth,
            nodes = self.nodes.len(),
            occupied = self.occupied.len(),
            unplaced = self.unplaced.len(),
            "built sphere octree"
        );
        Ok(&self.occupied)
    }

    fn assign_sphere(&mut self, node: NodeId, sphere: usize) -> bool {
        if !sphere_fully_in_box(&self.spheres[sphere], &self.nodes[node.0].bounds) {
            return false;
        }

        if let Some(children) = self.nodes[node.0].children {
            for child in children {
                if self.assign_sphere(child, sphere) {
                    return true;
                }
            }
        }

        let entry = &mut self.nodes[node.0];
        entry.spheres.push(sphere);
        if entry.spheres.len() == 1 {
            self.occupied.push(node);
        }
        true
    }

    /// The root node, once a tree has been built.
    #[must_use]
    pub fn root(&self) -> Option<&OctreeNode> {
        self.nodes.first()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    #[must_use]
    pub fn occupied(&self) -> &[NodeId] {
        &self.occupied
    }

    /// Spheres that fit no node of the last depth-1-or-deeper build.
    #[must_use]
    pub fn unplaced(&self) -> &[usize] {
        &self.unplaced
    }

    #[must_use]
    pub fn sphere(&self, index: usize) -> Option<&Sphere> {
        self.spheres.get(index)
    }

    #[must_use]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The registry as raw bytes, laid out as `[x, y, z, radius]` per sphere.
    #[must_use]
    pub fn sphere_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.spheres)
    }

    /// Sorted `(i, j)` pairs with `i < j` whose sphere AABBs overlap.
    ///
    /// Candidates share a node, sit in a node and one of its ancestors, or
    /// involve an unplaced sphere. Nothing is reported before the first build.
    #[must_use]
    pub fn potential_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = BTreeSet::new();

        for &id in &self.occupied {
            let members = &self.nodes[id.0].spheres;
            for (k, &a) in members.iter().enumerate() {
                for &b in &members[k + 1..] {
                    self.insert_if_overlapping(&mut pairs, a, b);
                }
            }

            let mut ancestor = self.nodes[id.0].parent;
            while let Some(up) = ancestor {
                for &a in members {
                    for &b in &self.nodes[up.0].spheres {
                        self.insert_if_overlapping(&mut pairs, a, b);
                    }
                }
                ancestor = self.nodes[up.0].parent;
            }
        }

        for &a in &self.unplaced {
            for b in 0..self.spheres.len() {
                if a != b {
                    self.insert_if_overlapping(&mut pairs, a, b);
                }
            }
        }

        pairs.into_iter().collect()
    }

    fn insert_if_overlapping(&self, pairs: &mut BTreeSet<(usize, usize)>, a: usize, b: usize) {
        if self.spheres[a].aabb().overlaps(&self.spheres[b].aabb()) {
            pairs.insert((a.min(b), a.max(b)));
        }
    }

    /// Sorted indices of spheres whose AABB overlaps `region`.
    ///
    /// Subtrees whose bounds miss the region are skipped. Before the first
    /// build every registered sphere is checked directly.
    #[must_use]
    pub fn query_region(&self, region: &Aabb) -> Vec<usize> {
        let overlaps = |sphere: usize| self.spheres[sphere].aabb().overlaps(region);

        if self.nodes.is_empty() {
            return (0..self.spheres.len()).filter(|&s| overlaps(s)).collect();
        }

        let mut found: Vec<usize> = self.unplaced.iter().copied().filter(|&s| overlaps(s)).collect();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            // A depth-0 root holds spheres outside its bounds.
            if id != NodeId::ROOT && !node.bounds.overlaps(region) {
                continue;
            }
            found.extend(node.spheres.iter().copied().filter(|&s| overlaps(s)));
            if let Some(children) = &node.children {
                stack.extend_from_slice(children);
            }
        }

        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Check octree build parameters without touching any tree.
///
/// # Errors
///
/// The same errors [`SphereIndex::build_tree`] reports.
pub fn validate_tree_params(depth: u32, size: Vec3) -> Result<(), PhysicsError> {
    if depth > MAX_TREE_DEPTH {
        return Err(PhysicsError::DepthTooLarge {
            depth,
            max: MAX_TREE_DEPTH,
        });
    }
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(PhysicsError::InvalidTreeSize(size));
    }
    Ok(())
}

/// Allocate a complete tree breadth-first: node `i`'s children are
/// contiguous and follow every node of the previous level.
fn subdivide(root_bounds: Aabb, depth: u32) -> Vec<OctreeNode> {
    let mut nodes = Vec::with_capacity(node_count(depth));
    nodes.push(OctreeNode::new(root_bounds, 0, None));

    let mut next = 0;
    while next < nodes.len() {
        let parent = &nodes[next];
        if parent.depth < depth {
            let child_depth = parent.depth + 1;
            let bounds = parent.bounds;
            let first_child = nodes.len();
            for signs in OCTANT_SIGNS {
                nodes.push(OctreeNode::new(
                    octant_bounds(&bounds, signs),
                    child_depth,
                    Some(NodeId(next)),
                ));
            }
            nodes[next].children = Some(std::array::from_fn(|i| NodeId(first_child + i)));
        }
        next += 1;
    }

    nodes
}

fn octant_bounds(parent: &Aabb, signs: [f32; 3]) -> Aabb {
    let quarter = (parent.upper - parent.lower) * 0.25;
    let center = parent.center() + Vec3::from(signs) * quarter;
    Aabb::new(center - quarter, center + quarter)
}
