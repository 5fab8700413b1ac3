use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wgraph::io::{DotWriter, EdgeListReader};
use wgraph::*;

const USAGE: &str = "usage: wgraph-cli [--graph-file PATH | --generate grid|er] [--n N] [--rows R] [--cols C]
                  [--p P] [--connected] [--maxw W] [--seed S] [--vertices N]
                  [--algo dijkstra|prim] [--source V] [--dest V] [--out-dir DIR] [--json]";

/// Upper bound for `--n`, `--rows * --cols` and `--vertices`.
const MAX_VERTICES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GraphType { Grid, ER }

#[derive(Debug, Clone, Copy, PartialEq)]
enum Algo { Dijkstra, Prim }

#[derive(Debug)]
struct Options {
    graph: GraphType,
    n: usize,
    rows: Option<usize>,
    cols: Option<usize>,
    p: f64,
    connected: bool,
    maxw: u32,
    seed: u64,
    vertices: usize,
    graph_file: Option<PathBuf>,
    algo: Algo,
    source: Option<String>,
    dest: Option<String>,
    out_dir: Option<PathBuf>,
    json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            graph: GraphType::ER,
            n: 100,
            rows: None,
            cols: None,
            p: 0.05,
            connected: false,
            maxw: 100,
            seed: 42,
            vertices: 0,
            graph_file: None,
            algo: Algo::Dijkstra,
            source: None,
            dest: None,
            out_dir: None,
            json: false,
        }
    }
}

#[derive(Serialize)]
struct OutputRow<'a> {
    algo: &'static str,
    graph: &'a str,
    n: usize,
    m: usize,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dest: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_weight: Option<Weight>,
    /// path hops or tree edges
    edges: usize,
    time_ns: u128,
    #[serde(flatten)]
    stats: SearchStats,
}

fn value<T: std::str::FromStr>(it: &mut impl Iterator<Item = String>, flag: &str) -> std::result::Result<T, String> {
    let raw = it.next().ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse().map_err(|_| format!("{flag}: cannot parse `{raw}`"))
}

/// `Ok(None)` when only help was requested.
fn parse_args(args: impl IntoIterator<Item = String>) -> std::result::Result<Option<Options>, String> {
    // Minimal, no external clap to keep deps small.
    let mut o = Options::default();
    let mut generator_flag: Option<String> = None;
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        if matches!(a.as_str(), "--generate" | "--graph" | "--n" | "--rows" | "--cols" | "--p" | "--connected" | "--maxw" | "--seed") {
            generator_flag.get_or_insert_with(|| a.clone());
        }
        match a.as_str() {
            "--generate" | "--graph" => {
                let v: String = value(&mut it, &a)?;
                o.graph = match v.as_str() {
                    "grid" => GraphType::Grid,
                    "er" => GraphType::ER,
                    _ => return Err(format!("unknown graph type `{v}`")),
                };
            }
            "--graph-file" => o.graph_file = Some(value::<PathBuf>(&mut it, &a)?),
            "--n" => o.n = value(&mut it, &a)?,
            "--rows" => o.rows = Some(value(&mut it, &a)?),
            "--cols" => o.cols = Some(value(&mut it, &a)?),
            "--p" => o.p = value(&mut it, &a)?,
            "--connected" => o.connected = true,
            "--maxw" => o.maxw = value(&mut it, &a)?,
            "--seed" => o.seed = value(&mut it, &a)?,
            "--vertices" => o.vertices = value(&mut it, &a)?,
            "--algo" => {
                let v: String = value(&mut it, &a)?;
                o.algo = match v.as_str() {
                    "dijkstra" => Algo::Dijkstra,
                    "prim" => Algo::Prim,
                    _ => return Err(format!("unknown algorithm `{v}`")),
                };
            }
            "--source" => o.source = Some(value(&mut it, &a)?),
            "--dest" => o.dest = Some(value(&mut it, &a)?),
            "--out-dir" => o.out_dir = Some(value::<PathBuf>(&mut it, &a)?),
            "--json" => o.json = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown flag `{other}`")),
        }
    }
    if let (Some(flag), Some(_)) = (&generator_flag, &o.graph_file) {
        return Err(format!("--graph-file cannot be combined with {flag}"));
    }
    if o.n > MAX_VERTICES {
        return Err(format!("--n must be at most {MAX_VERTICES}"));
    }
    if o.vertices > MAX_VERTICES {
        return Err(format!("--vertices must be at most {MAX_VERTICES}"));
    }
    let (rows, cols) = (o.rows.unwrap_or(1), o.cols.unwrap_or(1));
    if rows.checked_mul(cols).map_or(true, |v| v > MAX_VERTICES) {
        return Err(format!("--rows * --cols must be at most {MAX_VERTICES}"));
    }
    if o.maxw == 0 {
        return Err("--maxw must be at least 1".into());
    }
    if !(0.0..=1.0).contains(&o.p) {
        return Err("--p must be within [0, 1]".into());
    }
    Ok(Some(o))
}

fn init_tracing() {
    let default = if cfg!(debug_assertions) { "wgraph=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_graph(o: &Options) -> Result<(GraphStore, &'static str)> {
    if let Some(path) = o.graph_file.as_ref() {
        return Ok((EdgeListReader::new().vertex_hint(o.vertices).read_file(path)?, "file"));
    }
    let mut g = match o.graph {
        GraphType::Grid => {
            let side = (o.n as f64).sqrt() as usize;
            let rows = o.rows.unwrap_or(side.max(1));
            let cols = o.cols.unwrap_or(side.max(1));
            (gen::grid(rows, cols, o.maxw, o.seed)?, "grid")
        }
        GraphType::ER if o.connected => (gen::connected(o.n, o.p, o.maxw, o.seed)?, "er-connected"),
        GraphType::ER => (gen::erdos_renyi(o.n, o.p, o.maxw, o.seed)?, "er"),
    };
    g.0.reserve(o.vertices.saturating_sub(g.0.vertex_count()))?;
    Ok(g)
}

fn write_dot(dir: &Path, file: &str, f: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file);
    let mut w = BufWriter::new(File::create(&path)?);
    f(&mut w)?;
    w.flush()?;
    tracing::debug!(path = %path.display(), "wrote dot file");
    Ok(())
}

fn emit(row: &OutputRow<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(row).map_err(std::io::Error::from)?);
    }
    Ok(())
}

fn run(o: &Options) -> Result<ExitCode> {
    let (g, gname) = load_graph(o)?;
    let n = g.vertex_count();
    let m = g.edge_count();
    let Some(first) = g.vertices().next() else {
        eprintln!("graph is empty, nothing to do");
        return Ok(ExitCode::FAILURE);
    };
    let source = o.source.as_deref().unwrap_or(first);
    let dot = DotWriter::new();
    if let Some(dir) = o.out_dir.as_deref() {
        write_dot(dir, "graph.gv", |w| dot.write_graph(w, &g, "Full Graph"))?;
    }

    match o.algo {
        Algo::Dijkstra => {
            let dest = match o.dest.as_deref() {
                Some(d) => d,
                None => g.vertices().last().unwrap_or(source),
            };
            let start = Instant::now();
            let outcome = shortest_path(&g, source, dest)?;
            let time_ns = start.elapsed().as_nanos();
            let mut row = OutputRow {
                algo: "dijkstra", graph: gname, n, m, source, dest: Some(dest),
                status: "found", total_weight: None, edges: 0, time_ns, stats: SearchStats::default(),
            };
            match &outcome {
                PathOutcome::Found(p) => {
                    row.total_weight = Some(p.distance);
                    row.edges = p.path.len().saturating_sub(1);
                    row.stats = p.stats;
                    emit(&row, o.json)?;
                    eprintln!("shortest path {} (distance {}, {} hops)", p.path.join(" -> "), p.distance, row.edges);
                    for (from, to, w) in p.legs() {
                        eprintln!("  {from} -> {to}: {w}");
                    }
                    if let Some(dir) = o.out_dir.as_deref() {
                        write_dot(dir, "path.gv", |w| dot.write_shortest_path(w, &g, p))?;
                    }
                    Ok(ExitCode::SUCCESS)
                }
                PathOutcome::Unreachable { stats, .. } => {
                    row.status = "unreachable";
                    row.stats = *stats;
                    emit(&row, o.json)?;
                    eprintln!("no path between {source} and {dest}");
                    Ok(ExitCode::from(1))
                }
            }
        }
        Algo::Prim => {
            let start = Instant::now();
            let outcome = minimum_spanning_tree(&g, source)?;
            let time_ns = start.elapsed().as_nanos();
            let mut row = OutputRow {
                algo: "prim", graph: gname, n, m, source, dest: None,
                status: "spanning", total_weight: None, edges: 0, time_ns, stats: SearchStats::default(),
            };
            match &outcome {
                TreeOutcome::Spanning(t) => {
                    row.total_weight = Some(t.total_weight);
                    row.edges = t.edges.len();
                    row.stats = t.stats;
                    emit(&row, o.json)?;
                    eprintln!("minimum spanning tree from {source}: {} edges, total weight {}", t.edges.len(), t.total_weight);
                    for e in &t.edges {
                        eprintln!("  {} - {}: {}", e.from, e.to, e.weight);
                    }
                    if let Some(dir) = o.out_dir.as_deref() {
                        write_dot(dir, "mst.gv", |w| dot.write_spanning_tree(w, &g, t))?;
                    }
                    Ok(ExitCode::SUCCESS)
                }
                TreeOutcome::Disconnected { reached, vertex_count, stats, .. } => {
                    row.status = "disconnected";
                    row.stats = *stats;
                    row.edges = reached.len().saturating_sub(1);
                    emit(&row, o.json)?;
                    eprintln!("graph is disconnected: {} of {vertex_count} vertices reachable from {source}", reached.len());
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(Some(o)) => o,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    init_tracing();
    tracing::debug!(?opts, "options");
    match run(&opts) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Option<Options>, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn defaults_and_flags() {
        let o = parse(&["--generate", "grid", "--rows", "3", "--cols", "4", "--algo", "prim", "--json"]).unwrap().unwrap();
        assert_eq!(o.graph, GraphType::Grid);
        assert_eq!((o.rows, o.cols), (Some(3), Some(4)));
        assert_eq!(o.algo, Algo::Prim);
        assert!(o.json);
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--n"]).unwrap_err().contains("needs a value"));
    }

    #[test]
    fn sizes_are_bounded() {
        assert!(parse(&["--n", "1000001"]).unwrap_err().contains("--n"));
        assert!(parse(&["--vertices", "18446744073709551615"]).unwrap_err().contains("--vertices"));
        assert!(parse(&["--rows", "4294967296", "--cols", "4294967296"]).unwrap_err().contains("--rows"));
        assert!(parse(&["--rows", "1001", "--cols", "1000"]).is_err());
        assert!(parse(&["--n", "18446744073709551616"]).unwrap_err().contains("cannot parse"));
        assert!(parse(&["--rows", "1000", "--cols", "1000", "--vertices", "1000000"]).unwrap().is_some());
    }

    #[test]
    fn graph_file_excludes_generator_flags() {
        let err = parse(&["--graph-file", "g.txt", "--generate", "er"]).unwrap_err();
        assert!(err.contains("--generate"), "{err}");
        assert!(parse(&["--n", "10", "--graph-file", "g.txt"]).unwrap_err().contains("--n"));
        let o = parse(&["--graph-file", "g.txt", "--vertices", "50", "--algo", "dijkstra"]).unwrap().unwrap();
        assert_eq!(o.graph_file, Some(PathBuf::from("g.txt")));
        assert_eq!(o.vertices, 50);
    }
}
