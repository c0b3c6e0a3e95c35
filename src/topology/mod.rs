/*!
Topology module

Derives a graph of inferred links from a set of extracted devices.

Structure:
- `graph`: A small undirected graph keyed by hostname — adjacency map plus
           an edge-metadata side table, no duplicate edges, no self-loops.
- `infer`: The two-pass inference engine (subnet containment first,
           description correlation as fallback).

Re-exports:
- `TopologyGraph`, `LinkInfo`, and `infer` for easy consumption by callers.
*/

pub mod graph;
pub mod infer;

pub use graph::{EdgeKey, LinkInfo, TopologyGraph, TopologyNode};
pub use infer::infer;
