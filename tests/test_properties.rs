use proptest::{
    collection::vec,
    prop_assert, prop_assert_eq, prop_oneof, proptest,
    strategy::{Just, Strategy},
};
use yaml_scanner::{Scanner, Token, TokenData};

/// A node of a generated document.
#[derive(Debug, Clone)]
enum Node {
    Scalar(String),
    Flow(Vec<Flow>),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

/// An item of a flow sequence.
#[derive(Debug, Clone)]
enum Flow {
    Word(String),
    Sequence(Vec<Flow>),
}

fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        "[a-z]{1,4} [a-z]{1,4}",
        Just(String::from("x")),
    ]
}

fn flow() -> impl Strategy<Value = Flow> {
    word()
        .prop_map(Flow::Word)
        .prop_recursive(3, 16, 4, |inner| vec(inner, 0..4).prop_map(Flow::Sequence))
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        word().prop_map(Node::Scalar),
        vec(flow(), 0..4).prop_map(Node::Flow),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 1..4).prop_map(Node::Sequence),
            vec((word(), inner), 1..4).prop_map(Node::Mapping),
        ]
    })
}

fn render_flow(items: &[Flow], out: &mut String, words: &mut Vec<String>) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        match item {
            Flow::Word(word) => {
                out.push_str(word);
                words.push(word.clone());
            }
            Flow::Sequence(items) => render_flow(items, out, words),
        }
    }
    out.push(']');
}

/// Render the lines of a block collection at `indent`.
fn render_block(node: &Node, indent: usize, out: &mut String, words: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    match node {
        Node::Scalar(word) => {
            out.push_str(&pad);
            out.push_str(word);
            out.push('\n');
            words.push(word.clone());
        }
        Node::Flow(items) => {
            out.push_str(&pad);
            render_flow(items, out, words);
            out.push('\n');
        }
        Node::Sequence(items) => {
            for item in items {
                out.push_str(&pad);
                out.push('-');
                render_child(item, indent + 2, out, words);
            }
        }
        Node::Mapping(pairs) => {
            for (key, value) in pairs {
                out.push_str(&pad);
                out.push_str(key);
                out.push(':');
                words.push(key.clone());
                render_child(value, indent + 2, out, words);
            }
        }
    }
}

/// Render a node following a `-` or `key:` indicator.
fn render_child(node: &Node, indent: usize, out: &mut String, words: &mut Vec<String>) {
    match node {
        Node::Scalar(word) => {
            out.push(' ');
            out.push_str(word);
            out.push('\n');
            words.push(word.clone());
        }
        Node::Flow(items) => {
            out.push(' ');
            render_flow(items, out, words);
            out.push('\n');
        }
        Node::Sequence(_) | Node::Mapping(_) => {
            out.push('\n');
            render_block(node, indent, out, words);
        }
    }
}

fn document() -> impl Strategy<Value = (String, Vec<String>)> {
    node().prop_map(|node| {
        let mut out = String::new();
        let mut words = Vec::new();
        render_block(&node, 0, &mut out, &mut words);
        (out, words)
    })
}

fn scan(input: &str) -> Vec<Token> {
    let mut scanner = Scanner::new();
    scanner.set_input_string(input);
    scanner
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|err| panic!("{err} in {input:?}"))
}

proptest! {
    #[test]
    fn collections_are_balanced((input, _) in document()) {
        let tokens = scan(&input);
        prop_assert_eq!(&tokens.first().unwrap().data, &TokenData::StreamStart);
        prop_assert_eq!(&tokens.last().unwrap().data, &TokenData::StreamEnd);

        let mut open = Vec::new();
        for token in &tokens[1..tokens.len() - 1] {
            match &token.data {
                TokenData::BlockSequenceStart
                | TokenData::BlockMappingStart
                | TokenData::FlowSequenceStart
                | TokenData::FlowMappingStart => open.push(token.data.clone()),
                TokenData::BlockEnd => {
                    let start = open.pop();
                    prop_assert!(
                        start.as_ref().is_some_and(TokenData::is_block_collection_start),
                        "unmatched block end in {:?}",
                        input
                    );
                }
                TokenData::FlowSequenceEnd => {
                    prop_assert_eq!(open.pop(), Some(TokenData::FlowSequenceStart));
                }
                TokenData::FlowMappingEnd => {
                    prop_assert_eq!(open.pop(), Some(TokenData::FlowMappingStart));
                }
                TokenData::StreamStart | TokenData::StreamEnd => {
                    prop_assert!(false, "stream marker inside the stream: {:?}", input);
                }
                _ => {}
            }
        }
        prop_assert!(open.is_empty(), "unclosed collections {:?} in {:?}", open, input);
    }

    #[test]
    fn scalars_come_out_in_document_order((input, words) in document()) {
        let scalars = scan(&input)
            .iter()
            .filter_map(|token| token.data.scalar_text().map(String::from))
            .collect::<Vec<_>>();
        prop_assert_eq!(scalars, words);
    }

    #[test]
    fn rescanning_is_deterministic((input, _) in document()) {
        prop_assert_eq!(scan(&input), scan(&input));
    }
}
