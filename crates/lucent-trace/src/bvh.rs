//! Bounding Volume Hierarchy for accelerated ray tracing.
//!
//! Built once over an immutable scene snapshot using a binned Surface Area
//! Heuristic, then flattened into a depth-first linear node array. Queries
//! traverse the flat array iteratively with an explicit stack, visiting
//! the child the ray enters first so the closest-hit bound tightens early.

use std::sync::Arc;

use lucent_math::Point3;
use lucent_scene::{primitive_aabb, Aabb3, Scene};

use crate::intersect::intersect_primitive;
use crate::{Interaction, Ray};

/// Primitive ranges of this size or smaller become leaves.
const MAX_LEAF_SIZE: usize = 4;

/// Number of candidate split planes evaluated per axis.
const SAH_BUCKETS: usize = 12;

/// Relative cost of a traversal step vs. a primitive intersection test.
const SAH_TRAVERSAL_COST: f64 = 0.125;

/// Build-time record for one primitive: id, bounds, and partition key.
type PrimRecord = (usize, Aabb3, Point3);

/// A build-time BVH node: either a leaf holding primitive ids or an
/// interior node owning its two children. The whole tree is dropped once
/// flattening has produced the linear array.
#[derive(Debug)]
enum BuildNode {
    /// Leaf node containing primitive ids.
    Leaf {
        /// Bounding box of the contained primitives.
        aabb: Aabb3,
        /// Ids of the primitives in this leaf.
        prims: Vec<usize>,
    },
    /// Interior node with two children.
    Interior {
        /// Union of both children's boxes.
        aabb: Aabb3,
        /// Axis the children were partitioned along.
        axis: usize,
        /// Left child (nearer along `axis` for a positive-direction ray).
        left: Box<BuildNode>,
        /// Right child.
        right: Box<BuildNode>,
    },
}

/// A flattened BVH node.
///
/// Nodes are stored in depth-first pre-order: an interior node's left
/// child always occupies the next slot, so only the right child's slot
/// needs storing. Node 0 is the root.
#[derive(Debug, Clone, Copy)]
pub enum LinearNode {
    /// Leaf referencing a contiguous range of the ordered primitive-id array.
    Leaf {
        /// Bounding box of the contained primitives.
        aabb: Aabb3,
        /// Start of the range in the ordered primitive-id array.
        first: u32,
        /// Number of primitives in the range.
        count: u32,
    },
    /// Interior node; the left child lives at the following slot.
    Interior {
        /// Union of both children's boxes.
        aabb: Aabb3,
        /// Slot of the right child. Always greater than this node's slot + 1.
        right_child: u32,
        /// Axis the children were partitioned along (0 = x, 1 = y, 2 = z).
        axis: u8,
    },
}

impl LinearNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            LinearNode::Leaf { aabb, .. } | LinearNode::Interior { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy over a scene's primitives.
///
/// Immutable after [`Bvh::build`]; concurrent queries from multiple
/// threads are safe because traversal state lives entirely in the query.
#[derive(Debug, Clone)]
pub struct Bvh {
    scene: Arc<Scene>,
    nodes: Vec<LinearNode>,
    /// Permutation of scene primitive ids, grouped so that each leaf's
    /// primitives are contiguous.
    ordered_prims: Vec<usize>,
}

impl Bvh {
    /// Build a BVH over a snapshot of `scene`.
    ///
    /// Primitives whose bounds are not finite would poison every box
    /// union above them; they are skipped with a logged diagnostic and
    /// simply never hit. A scene with no usable primitives yields a BVH
    /// whose every query misses.
    pub fn build(scene: &Scene) -> Self {
        let scene = Arc::new(scene.clone());

        let mut records: Vec<PrimRecord> = Vec::with_capacity(scene.primitive_count());
        for (id, prim) in scene.primitives().iter().enumerate() {
            let aabb = primitive_aabb(&scene, prim);
            if !aabb.is_finite() {
                log::warn!("skipping primitive {} with non-finite bounds", id);
                continue;
            }
            records.push((id, aabb, aabb.centroid()));
        }

        if records.is_empty() {
            return Self {
                scene,
                nodes: Vec::new(),
                ordered_prims: Vec::new(),
            };
        }

        let mut node_count = 0;
        let root = build_node(&mut records, &mut node_count);

        let mut nodes = Vec::with_capacity(node_count);
        let mut ordered_prims = Vec::with_capacity(records.len());
        flatten_node(&root, &mut nodes, &mut ordered_prims);
        debug_assert_eq!(nodes.len(), node_count);
        debug_assert_eq!(ordered_prims.len(), records.len());

        Self {
            scene,
            nodes,
            ordered_prims,
        }
    }

    /// The scene snapshot this BVH indexes.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The flattened node array. Empty only for a scene with no usable
    /// primitives.
    pub fn nodes(&self) -> &[LinearNode] {
        &self.nodes
    }

    /// The ordered primitive-id array referenced by leaf ranges.
    pub fn ordered_primitive_ids(&self) -> &[usize] {
        &self.ordered_prims
    }

    /// Bounding box of the whole indexed scene, if it has any primitives.
    pub fn bounds(&self) -> Option<Aabb3> {
        self.nodes.first().map(|node| *node.aabb())
    }

    /// Find the nearest intersection of `ray` with the scene.
    pub fn intersect(&self, ray: &Ray) -> Option<Interaction> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<Interaction> = None;
        let mut closest_t = f64::INFINITY;

        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];
            let entry = match ray.intersect_aabb(node.aabb()) {
                Some((t_entry, _)) => t_entry,
                None => continue,
            };
            // Box entry beyond the current closest hit: prune the subtree
            if entry >= closest_t {
                continue;
            }

            match *node {
                LinearNode::Leaf { first, count, .. } => {
                    for &prim_id in &self.ordered_prims[first as usize..(first + count) as usize] {
                        let prim = &self.scene.primitives()[prim_id];
                        if let Some((t, normal)) =
                            intersect_primitive(&self.scene, ray, prim, closest_t)
                        {
                            closest_t = t;
                            closest = Some(Interaction {
                                t,
                                point: ray.at(t),
                                normal,
                                primitive: prim_id,
                                material: prim.material,
                            });
                        }
                    }
                }
                LinearNode::Interior {
                    right_child, axis, ..
                } => {
                    // Descend the child the ray enters first; stash the far
                    // one. The stack pops last-pushed, so push far first.
                    if ray.dir_is_negative(axis as usize) {
                        stack.push(index + 1);
                        stack.push(right_child);
                    } else {
                        stack.push(right_child);
                        stack.push(index + 1);
                    }
                }
            }
        }

        closest
    }

    /// Test whether `ray` intersects anything at all, stopping at the
    /// first hit. Cheaper than [`Bvh::intersect`] for occlusion queries.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];
            if ray.intersect_aabb(node.aabb()).is_none() {
                continue;
            }

            match *node {
                LinearNode::Leaf { first, count, .. } => {
                    for &prim_id in &self.ordered_prims[first as usize..(first + count) as usize] {
                        let prim = &self.scene.primitives()[prim_id];
                        if intersect_primitive(&self.scene, ray, prim, f64::INFINITY).is_some() {
                            return true;
                        }
                    }
                }
                LinearNode::Interior { right_child, .. } => {
                    stack.push(index + 1);
                    stack.push(right_child);
                }
            }
        }

        false
    }
}

/// Build a BVH node recursively, partitioning `records` in place.
fn build_node(records: &mut [PrimRecord], node_count: &mut usize) -> BuildNode {
    *node_count += 1;

    let mut bounds = Aabb3::empty();
    for (_, aabb, _) in records.iter() {
        bounds = bounds.union(aabb);
    }

    if records.len() <= MAX_LEAF_SIZE {
        return BuildNode::Leaf {
            aabb: bounds,
            prims: records.iter().map(|(id, _, _)| *id).collect(),
        };
    }

    let (axis, split_pos) = find_best_split(records, &bounds);
    let mid = partition_records(records, axis, split_pos);

    // Every centroid landed on one side (coincident centroids, or no axis
    // was splittable): fall back to an even index split so both children
    // are non-empty and the recursion terminates.
    let mid = if mid == 0 || mid == records.len() {
        records.len() / 2
    } else {
        mid
    };

    let (left_records, right_records) = records.split_at_mut(mid);
    BuildNode::Interior {
        aabb: bounds,
        axis,
        left: Box::new(build_node(left_records, node_count)),
        right: Box::new(build_node(right_records, node_count)),
    }
}

/// Find the best split axis and position using the binned SAH.
fn find_best_split(records: &[PrimRecord], bounds: &Aabb3) -> (usize, f64) {
    let extent = bounds.extent();

    let mut best_cost = f64::INFINITY;
    let mut best_axis = 0;
    let mut best_pos = 0.0;

    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = bounds.min[axis];

        // Bin primitives by centroid along this axis
        let mut bucket_counts = [0usize; SAH_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); SAH_BUCKETS];
        for (_, aabb, centroid) in records {
            let offset = (centroid[axis] - axis_min) / axis_extent;
            let b = ((offset * SAH_BUCKETS as f64) as usize).min(SAH_BUCKETS - 1);
            bucket_counts[b] += 1;
            bucket_bounds[b] = bucket_bounds[b].union(aabb);
        }

        // Sweep the candidate planes between buckets
        let total_area = bounds.surface_area();
        for split in 1..SAH_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                left_bounds = left_bounds.union(&bucket_bounds[i]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..SAH_BUCKETS {
                right_count += bucket_counts[i];
                right_bounds = right_bounds.union(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = SAH_TRAVERSAL_COST
                + left_bounds.surface_area() / total_area * left_count as f64
                + right_bounds.surface_area() / total_area * right_count as f64;

            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_pos = axis_min + (split as f64 / SAH_BUCKETS as f64) * axis_extent;
            }
        }
    }

    (best_axis, best_pos)
}

/// Partition records by centroid along an axis. Returns the index of the
/// first record on the right side.
fn partition_records(records: &mut [PrimRecord], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = records.len();

    while left < right {
        if records[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            records.swap(left, right);
        }
    }

    left
}

/// Recursively flatten a build node into the linear array, depth-first
/// pre-order. Leaf primitive ids are appended to `ordered_prims` as leaves
/// are visited, so each leaf's range is contiguous. Returns the node's slot.
fn flatten_node(
    node: &BuildNode,
    nodes: &mut Vec<LinearNode>,
    ordered_prims: &mut Vec<usize>,
) -> u32 {
    let slot = nodes.len() as u32;

    match node {
        BuildNode::Leaf { aabb, prims } => {
            let first = ordered_prims.len() as u32;
            ordered_prims.extend(prims.iter().copied());
            nodes.push(LinearNode::Leaf {
                aabb: *aabb,
                first,
                count: prims.len() as u32,
            });
        }
        BuildNode::Interior {
            aabb,
            axis,
            left,
            right,
        } => {
            // Reserve this slot; the right child's index is patched in
            // once the left subtree has claimed its slots.
            nodes.push(LinearNode::Interior {
                aabb: *aabb,
                right_child: 0,
                axis: *axis as u8,
            });

            flatten_node(left, nodes, ordered_prims);
            let right_slot = flatten_node(right, nodes, ordered_prims);

            nodes[slot as usize] = LinearNode::Interior {
                aabb: *aabb,
                right_child: right_slot,
                axis: *axis as u8,
            };
        }
    }

    slot
}
