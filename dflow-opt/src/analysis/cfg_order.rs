use dflow_ir::{Cfg, Id};
use linked_hash_map::LinkedHashMap;
use std::collections::{HashSet, VecDeque};

/// An edge `(tail, head)` whose head was on the depth-first path when the
/// edge was explored.
pub type BackEdge = (Id, Id);

/// Breadth-first distances from `entry`, in discovery order. Nodes that are
/// not reachable from `entry` are absent.
pub fn path_lengths(cfg: &Cfg, entry: Id) -> LinkedHashMap<Id, usize> {
    let mut distances = LinkedHashMap::new();
    distances.insert(entry, 0);
    let mut queue = VecDeque::from([entry]);

    while let Some(node) = queue.pop_front() {
        let dist = distances[&node];
        for &succ in cfg.successors(&node) {
            if !distances.contains_key(&succ) {
                distances.insert(succ, dist + 1);
                queue.push_back(succ);
            }
        }
    }
    distances
}

/// Nodes reachable from `entry` in reverse postorder: every node comes after
/// all of its predecessors except the ones reached through a back edge.
pub fn reverse_postorder(cfg: &Cfg, entry: Id) -> Vec<Id> {
    let mut visited = HashSet::from([entry]);
    let mut postorder = Vec::new();
    // Each frame is a node and the index of the next successor to explore.
    let mut stack: Vec<(Id, usize)> = vec![(entry, 0)];

    while let Some(top) = stack.last_mut() {
        let (node, idx) = *top;
        match cfg.successors(&node).get(idx) {
            Some(&succ) => {
                top.1 += 1;
                if visited.insert(succ) {
                    stack.push((succ, 0));
                }
            }
            None => {
                postorder.push(node);
                stack.pop();
            }
        }
    }

    postorder.reverse();
    postorder
}

/// Edges that close a cycle during a depth-first traversal from `entry`, in
/// the order they are found. Self-loops are back edges.
pub fn back_edges(cfg: &Cfg, entry: Id) -> Vec<BackEdge> {
    let mut visited = HashSet::from([entry]);
    let mut on_path = HashSet::from([entry]);
    let mut back = Vec::new();
    let mut stack: Vec<(Id, usize)> = vec![(entry, 0)];

    while let Some(top) = stack.last_mut() {
        let (node, idx) = *top;
        match cfg.successors(&node).get(idx) {
            Some(&succ) => {
                top.1 += 1;
                if on_path.contains(&succ) {
                    back.push((node, succ));
                } else if visited.insert(succ) {
                    on_path.insert(succ);
                    stack.push((succ, 0));
                }
            }
            None => {
                on_path.remove(&node);
                stack.pop();
            }
        }
    }
    back
}

/// Approximate reducibility test.
///
/// A graph is reported reducible when the head of every back edge is
/// strictly closer to `entry` (in breadth-first distance) than its tail.
/// Distance stands in for dominance here: a loop header that is closer to
/// the entry than the rest of the loop is assumed to dominate it. Graphs
/// where a node is closer without dominating can be misclassified.
pub fn is_reducible(cfg: &Cfg, entry: Id) -> bool {
    let back = back_edges(cfg, entry);
    if back.is_empty() {
        return true;
    }
    let distances = path_lengths(cfg, entry);
    back.iter().all(|(tail, head)| {
        match (distances.get(head), distances.get(tail)) {
            (Some(h), Some(t)) => h < t,
            _ => false,
        }
    })
}
