//! End-to-end matching behavior, driven through the public surface.

use pretty_assertions::assert_eq;

use rx_graph::Graph;

fn graph(pattern: &str) -> Graph {
    Graph::compile(pattern).unwrap()
}

#[test]
fn literal_pair() {
    let pair = graph("aa");
    let matcher = pair.find(b"aa");
    assert!(matcher.ok());
    assert_eq!(matcher.group(0), b"aa");
    assert_eq!(pair.match_len(b"aa"), 2);
    assert_eq!(pair.match_len(b"aaa"), 2);
    assert_eq!(pair.match_len(b"a"), -1);
}

#[test]
fn literal_is_substring_search() {
    let needle = graph("bc");
    assert_eq!(needle.match_len(b"abcd"), 2);
    let matcher = needle.find(b"abcd");
    assert_eq!(matcher.begin_idx(), 1);
    assert_eq!(matcher.end_idx(), 3);
    assert!(!needle.find(b"acbd").ok());
}

#[test]
fn nested_groups() {
    let nested = graph("aa*|b(cd*(e|fg))?h|i");
    let (ok, groups) = nested.match_groups(b"bcdddfgh");
    assert!(ok);
    assert_eq!(groups, vec![&b"bcdddfgh"[..], &b"cdddfg"[..], &b"fg"[..]]);
    assert_eq!(nested.match_len(b"i"), 1);
    assert_eq!(nested.match_len(b"bh"), 2);
}

#[test]
fn lookahead_transfers_captures() {
    let ahead = graph("a(?=(b))(b|c)");
    let matcher = ahead.find(b"ab");
    assert!(matcher.ok());
    assert_eq!(matcher.group(1), b"b");
    assert_eq!(matcher.group(2), b"b");
    assert!(!ahead.find(b"ac").ok());
}

#[test]
fn lookahead_searches_the_remainder() {
    // the assertion matches anywhere in the remaining input, exactly
    // like a top-level search over the suffix
    let ahead = graph("a(?=c)");
    assert!(ahead.find(b"abc").ok());
    assert!(!ahead.find(b"ab").ok());
}

#[test]
fn negative_lookahead() {
    let neg = graph("a(?!b).");
    assert_eq!(neg.match_len(b"ac"), 2);
    assert_eq!(neg.match_len(b"ab"), -1);
}

#[test]
fn possessive_star_keeps_what_it_ate() {
    assert_eq!(graph("a*+b").match_len(b"aaab"), 4);
    assert!(!graph(".*+b").find(b"b").ok());
}

#[test]
fn possessive_never_gives_back() {
    let star = graph("a*+a");
    assert_eq!(star.match_len(b"a"), -1);
    assert_eq!(star.match_len(b"aa"), -1);
}

#[test]
fn atomic_group_commits() {
    let first = graph("(?>a|ab)c");
    assert_eq!(first.match_len(b"ac"), 2);
    assert_eq!(first.match_len(b"abc"), -1);
    let second = graph("(?>ab|a)c");
    assert_eq!(second.match_len(b"abc"), 3);
}

#[test]
fn named_backreference() {
    let back = graph("(?P<a>b|c)(?P=a)d");
    let matcher = back.find(b"bbd");
    assert!(matcher.ok());
    assert_eq!(matcher.group_named("a"), b"b");
    assert_eq!(back.match_len(b"ccd"), 3);
    assert!(!back.find(b"bcd").ok());
}

#[test]
fn uncaptured_backreference_matches_emptiness() {
    let back = graph("(?P<x>a)?(?P=x)b");
    assert_eq!(back.match_len(b"b"), 1);
    assert_eq!(back.match_len(b"aab"), 3);
}

#[test]
fn empty_input_and_empty_pattern() {
    assert_eq!(graph("a*").match_len(b""), 0);
    assert_eq!(graph("a?").match_len(b""), 0);
    assert_eq!(graph("").match_len(b"abc"), 0);
}

#[test]
fn begin_anchor() {
    let anchored = graph("^ab");
    assert_eq!(anchored.match_len(b"ab"), 2);
    assert_eq!(anchored.match_len(b"xab"), -1);
}

#[test]
fn end_anchor() {
    let anchored = graph("ab$");
    assert_eq!(anchored.match_len(b"xab"), 2);
    assert_eq!(anchored.match_len(b"abx"), -1);
}

#[test]
fn both_anchors() {
    let exact = graph("^a*$");
    assert_eq!(exact.match_len(b"aaa"), 3);
    assert_eq!(exact.match_len(b""), 0);
    assert_eq!(exact.match_len(b"aba"), -1);
}

#[test]
fn any_matches_newline() {
    assert_eq!(graph("a.b").match_len(b"a\nb"), 3);
}

#[test]
fn counted_forms() {
    assert_eq!(graph("a{2}").match_len(b"aaa"), 2);
    assert_eq!(graph("a{2}").match_len(b"a"), -1);
    assert_eq!(graph("a{2,}").match_len(b"aaaa"), 4);
    assert_eq!(graph("a{2,}").match_len(b"a"), -1);
    assert_eq!(graph("a{,2}").match_len(b"aaa"), 2);
    assert_eq!(graph("a{,2}").match_len(b""), 0);
    assert_eq!(graph("a{1,3}").match_len(b"aa"), 2);
}

#[test]
fn zero_repetitions() {
    assert_eq!(graph("a{0,0}").match_len(b"a"), 0);
    assert_eq!(graph("a{,0}").match_len(b"a"), 0);
}

#[test]
fn reluctant_counted_stops_at_lower_bound() {
    let reluctant = graph("a{2,4}?");
    let matcher = reluctant.find(b"aaaa");
    assert!(matcher.ok());
    assert_eq!(matcher.size(), 2);
}

#[test]
fn possessive_counted_cut() {
    assert_eq!(graph("a{2,3}+a").match_len(b"aaa"), -1);
    assert_eq!(graph("a{2,3}a").match_len(b"aaa"), 3);
}

#[test]
fn classes_and_shorthands() {
    assert_eq!(graph("[a-f]+").match_len(b"deadbeef"), 8);
    assert_eq!(graph("[^0-9]+").match_len(b"ab1"), 2);
    assert_eq!(graph(r"\d+\s\w+").match_len(b"42 answers"), 10);
    assert_eq!(graph(r"\D+").match_len(b"ab3"), 2);
}

#[test]
fn escaped_metacharacters() {
    assert_eq!(graph(r"a\.b").match_len(b"a.b"), 3);
    assert_eq!(graph(r"a\.b").match_len(b"axb"), -1);
    assert_eq!(graph(r"\(\)").match_len(b"()"), 2);
}

#[test]
fn greedy_takes_leftmost_longest() {
    assert_eq!(graph("(a|b)*a").match_len(b"babac"), 4);
    assert_eq!(graph("(a|b)*?a").match_len(b"babac"), 2);
}

#[test]
fn group_numbering_skips_uncaptured() {
    let mixed = graph("(a)(?:bc)(?P<x>d)");
    let (ok, groups) = mixed.match_groups(b"abcd");
    assert!(ok);
    assert_eq!(groups, vec![&b"abcd"[..], &b"a"[..], &b"d"[..]]);
}
