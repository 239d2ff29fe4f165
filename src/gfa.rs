// src/gfa.rs

//! Graph input parsing. Two formats feed the layout engine: GFA (`S` segment lines
//! and `L` link lines, streamed, everything else skipped) and a plain whitespace
//! edge list. Both produce the node count plus the spring constraints the
//! objective consumes.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::objective::LinkInfo;

/// A parsed graph: node names in index order plus undirected links. Links are
/// plain attraction springs (zero rest offset, unit stiffness); repulsion between
/// unlinked nodes is the objective's job, not the input's.
#[derive(Debug)]
pub struct GraphSpec {
    pub names: Vec<String>,
    pub links: Vec<LinkInfo>,
}

impl GraphSpec {
    pub fn node_count(&self) -> usize {
        self.names.len()
    }
}

/// Load a graph from disk, dispatching on the extension: `.gfa` is parsed as GFA,
/// anything else as a whitespace-separated edge list.
pub fn load_graph(path: &Path) -> io::Result<GraphSpec> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let is_gfa = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gfa"))
        .unwrap_or(false);

    let spec = if is_gfa {
        parse_gfa(reader)?
    } else {
        parse_edge_list(reader)?
    };

    eprintln!(
        "[gfa] Loaded {} nodes and {} links from {}.",
        spec.node_count(),
        spec.links.len(),
        path.display()
    );
    Ok(spec)
}

/// Parse GFA from a reader. `S` lines register nodes; `L` lines register
/// undirected links and create any endpoint not yet seen. Duplicate links and
/// self-loops are dropped. Other record types (`H`, `P`, `C`, ...) are skipped.
pub fn parse_gfa<R: BufRead>(reader: R) -> io::Result<GraphSpec> {
    let mut builder = GraphBuilder::new();

    for (lineno, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split('\t');
        let rec_type = match parts.next() {
            Some(t) => t,
            None => continue,
        };
        match rec_type {
            "S" => {
                // S <Name> <Sequence> [tags...]
                let name = parts.next().ok_or_else(|| {
                    malformed(lineno, "S line is missing the segment name")
                })?;
                builder.node(name);
            }
            "L" => {
                // L <From> <FromOrient> <To> <ToOrient> [<CIGAR> tags...]
                let from = parts.next().ok_or_else(|| {
                    malformed(lineno, "L line is missing the source segment")
                })?;
                let _from_orient = parts.next();
                let to = match parts.next() {
                    Some(t) => t,
                    None => {
                        return Err(malformed(lineno, "L line is missing the target segment"))
                    }
                };
                builder.link(from, to);
            }
            _ => {}
        }
    }

    builder.finish()
}

/// Parse a whitespace-separated edge list: one `from to` pair per line, `#`
/// comments and blank lines skipped.
pub fn parse_edge_list<R: BufRead>(reader: R) -> io::Result<GraphSpec> {
    let mut builder = GraphBuilder::new();

    for (lineno, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let from = parts.next().ok_or_else(|| malformed(lineno, "empty edge line"))?;
        let to = parts.next().ok_or_else(|| {
            malformed(lineno, "edge line needs two node names")
        })?;
        builder.link(from, to);
    }

    builder.finish()
}

fn malformed(lineno: usize, what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("line {}: {}", lineno + 1, what),
    )
}

/// Accumulates nodes in first-seen order and deduplicated undirected links.
struct GraphBuilder {
    names: Vec<String>,
    index: HashMap<String, usize>,
    seen: HashSet<(usize, usize)>,
    links: Vec<LinkInfo>,
}

impl GraphBuilder {
    fn new() -> Self {
        GraphBuilder {
            names: Vec::new(),
            index: HashMap::new(),
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    fn node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        i
    }

    fn link(&mut self, from: &str, to: &str) {
        let i = self.node(from);
        let j = self.node(to);
        if i == j {
            return;
        }
        let key = (i.min(j), i.max(j));
        if self.seen.insert(key) {
            self.links.push(LinkInfo::attraction(key.0, key.1));
        }
    }

    fn finish(self) -> io::Result<GraphSpec> {
        if self.names.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no nodes in input; nothing to lay out",
            ));
        }
        Ok(GraphSpec {
            names: self.names,
            links: self.links,
        })
    }
}
