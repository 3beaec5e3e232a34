mod common;

use pretty_assertions::assert_eq;
use yaml_scanner::TokenData::{
    BlockEnd, BlockEntry, BlockMappingStart, BlockSequenceStart, DocumentEnd, DocumentStart,
    FlowEntry, FlowMappingEnd, FlowMappingStart, FlowSequenceEnd, FlowSequenceStart, Key,
    StreamEnd, StreamStart, Value, VersionDirective,
};

use self::common::{
    alias, anchor, double_quoted, folded, literal, plain, scan, single_quoted, tag, tag_directive,
};

#[test]
fn test_directives() {
    let tokens = scan(include_str!("data/01-directives.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            VersionDirective { major: 1, minor: 1 },
            tag_directive("!", "!foo"),
            tag_directive("!yaml!", "tag:yaml.org,2002:"),
            DocumentStart,
            StreamEnd,
        ]
    );
}

#[test]
fn test_scalar_in_implicit_document() {
    let tokens = scan(include_str!("data/02-scalar-in-imp-doc.yaml")).unwrap();
    assert_eq!(
        tokens,
        [StreamStart, single_quoted("a scalar"), StreamEnd]
    );
}

#[test]
fn test_scalar_in_explicit_document() {
    let tokens = scan(include_str!("data/03-scalar-in-exp-doc.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            DocumentStart,
            single_quoted("a scalar"),
            DocumentEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_scalars_in_multiple_documents() {
    let tokens = scan(include_str!("data/04-scalars-in-multi-docs.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            single_quoted("a scalar"),
            DocumentStart,
            single_quoted("another scalar"),
            DocumentStart,
            single_quoted("yet another scalar"),
            StreamEnd,
        ]
    );
}

#[test]
fn test_circular_sequence() {
    let tokens = scan(include_str!("data/05-circular-sequence.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            anchor("A"),
            FlowSequenceStart,
            alias("A"),
            FlowSequenceEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_tagged_scalar() {
    let tokens = scan(include_str!("data/06-float-tag.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            tag("!!", "float"),
            double_quoted("3.14"),
            StreamEnd,
        ]
    );
}

#[test]
fn test_scalar_styles() {
    let tokens = scan(include_str!("data/07-scalar-styles.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            DocumentStart,
            DocumentStart,
            plain("a plain scalar"),
            DocumentStart,
            single_quoted("a single-quoted scalar"),
            DocumentStart,
            double_quoted("a double-quoted scalar"),
            DocumentStart,
            literal("a literal scalar"),
            DocumentStart,
            folded("a folded scalar"),
            StreamEnd,
        ]
    );
}

#[test]
fn test_flow_sequence() {
    let tokens = scan(include_str!("data/08-flow-sequence.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            FlowSequenceStart,
            plain("item 1"),
            FlowEntry,
            plain("item 2"),
            FlowEntry,
            plain("item 3"),
            FlowSequenceEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_flow_mapping() {
    let tokens = scan(include_str!("data/09-flow-mapping.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            FlowMappingStart,
            Key,
            plain("a simple key"),
            Value,
            plain("a value"),
            FlowEntry,
            Key,
            plain("a complex key"),
            Value,
            plain("another value"),
            FlowEntry,
            FlowMappingEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_mixed_nodes_in_sequence() {
    let tokens = scan(include_str!("data/10-mixed-nodes-in-sequence.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            BlockSequenceStart,
            BlockEntry,
            plain("item 1"),
            BlockEntry,
            plain("item 2"),
            BlockEntry,
            BlockSequenceStart,
            BlockEntry,
            plain("item 3.1"),
            BlockEntry,
            plain("item 3.2"),
            BlockEnd,
            BlockEntry,
            BlockMappingStart,
            Key,
            plain("key 1"),
            Value,
            plain("value 1"),
            Key,
            plain("key 2"),
            Value,
            plain("value 2"),
            BlockEnd,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_mixed_nodes_in_mapping() {
    let tokens = scan(include_str!("data/11-mixed-nodes-in-mapping.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            BlockMappingStart,
            Key,
            plain("a simple key"),
            Value,
            plain("a value"),
            Key,
            plain("a complex key"),
            Value,
            plain("another value"),
            Key,
            plain("a mapping"),
            Value,
            BlockMappingStart,
            Key,
            plain("key 1"),
            Value,
            plain("value 1"),
            Key,
            plain("key 2"),
            Value,
            plain("value 2"),
            BlockEnd,
            Key,
            plain("a sequence"),
            Value,
            BlockSequenceStart,
            BlockEntry,
            plain("item 1"),
            BlockEntry,
            plain("item 2"),
            BlockEnd,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_compact_sequence() {
    let tokens = scan(include_str!("data/12-compact-sequence.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            BlockSequenceStart,
            BlockEntry,
            BlockSequenceStart,
            BlockEntry,
            plain("item 1"),
            BlockEntry,
            plain("item 2"),
            BlockEnd,
            BlockEntry,
            BlockMappingStart,
            Key,
            plain("key 1"),
            Value,
            plain("value 1"),
            Key,
            plain("key 2"),
            Value,
            plain("value 2"),
            BlockEnd,
            BlockEntry,
            BlockMappingStart,
            Key,
            plain("complex key"),
            Value,
            plain("complex value"),
            BlockEnd,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_compact_mapping() {
    let tokens = scan(include_str!("data/13-compact-mapping.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            BlockMappingStart,
            Key,
            plain("a sequence"),
            Value,
            BlockSequenceStart,
            BlockEntry,
            plain("item 1"),
            BlockEntry,
            plain("item 2"),
            BlockEnd,
            Key,
            plain("a mapping"),
            Value,
            BlockMappingStart,
            Key,
            plain("key 1"),
            Value,
            plain("value 1"),
            Key,
            plain("key 2"),
            Value,
            plain("value 2"),
            BlockEnd,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_indentless_sequence_in_mapping() {
    let tokens = scan(include_str!("data/14-mapping-wo-indent.yaml")).unwrap();
    assert_eq!(
        tokens,
        [
            StreamStart,
            BlockMappingStart,
            Key,
            plain("key"),
            Value,
            BlockEntry,
            plain("item 1"),
            BlockEntry,
            plain("item 2"),
            BlockEnd,
            StreamEnd,
        ]
    );
}
