/**
 * A short tour: escapes, named groups, back-references, and what the
 * compiled graph looks like.
 */

use rx_graph::Graph;

fn main() {
    let graph = Graph::compile(r"a(\w)(?P<name>d|e)(?P=name)")
        .expect("the example pattern is well-formed");
    let matcher = graph.find(b"ba_dd");
    if !matcher.ok() {
        println!("not match");
        return;
    }
    println!("match: {}", String::from_utf8_lossy(matcher.matched()));
    println!("<1>: {}", String::from_utf8_lossy(matcher.group(1)));
    println!("<name>: {}", String::from_utf8_lossy(matcher.group_named("name")));
    println!();
    println!("{}", graph.to_mermaid());
}
