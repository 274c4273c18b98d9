//! Selective-load (message/signal filter) behavior.

use can_network::{load_dbc_from_str, load_dbc_from_str_filtered};

const INPUT: &str = concat!(
    "VERSION \"\"\nNS_ :\nBS_:\nBU_ ECU1 ECU2\n",
    "VAL_TABLE_ OnOff 1 \"On\" 0 \"Off\" ;\n",
    "BO_ 256 First: 8 ECU1\n",
    " SG_ A : 0|8@1+ (1,0) [0|255] \"\"\n",
    " SG_ B : 8|8@1+ (1,0) [0|255] \"\"\n",
    "BO_ 512 Second: 8 ECU2\n",
    " SG_ C : 0|8@1+ (1,0) [0|255] \"\"\n",
    " SG_ D : 8|8@1+ (1,0) [0|255] \"\"\n",
    "BA_DEF_ BO_ \"MsgAttr\" INT 0 100;\n",
    "BA_DEF_ SG_ \"SigAttr\" INT 0 100;\n",
    "BA_ \"MsgAttr\" BO_ 512 7;\n",
    "BA_ \"SigAttr\" SG_ 256 B 9;\n",
    "VAL_ 256 B 1 \"one\" ;\n",
    "CM_ BU_ ECU1 \"kept node\";\n",
);

#[test]
fn signal_filter_prunes_within_surviving_messages() {
    let net = load_dbc_from_str_filtered(INPUT, &|_, _| true, &|sig, _| {
        sig == "A" || sig == "C"
    })
    .unwrap();

    assert_eq!(net.messages_len(), 2);
    let first = net.get_message_by_id(256).unwrap();
    let names: Vec<&str> = first.signals(&net).map(|s| s.name()).collect();
    assert_eq!(names, vec!["A"]);
    let second = net.get_message_by_id(512).unwrap();
    let names: Vec<&str> = second.signals(&net).map(|s| s.name()).collect();
    assert_eq!(names, vec!["C"]);
}

#[test]
fn message_filter_drops_whole_messages_and_their_metadata() {
    let net = load_dbc_from_str_filtered(INPUT, &|id, _| id != 512, &|_, _| true).unwrap();

    assert_eq!(net.messages_len(), 1);
    assert!(net.get_message_by_id(512).is_none());

    // Dropped-message metadata is gone; everything else is intact.
    let first = net.get_message_by_id(256).unwrap();
    assert_eq!(first.signals(&net).count(), 2);
    let b = first.get_signal_by_name(&net, "B").unwrap();
    assert_eq!(b.attributes().len(), 1);
    assert_eq!(b.value_descriptions().len(), 1);
}

#[test]
fn filter_by_message_name() {
    let net = load_dbc_from_str_filtered(INPUT, &|_, name| name == "Second", &|_, _| true).unwrap();
    let names: Vec<String> = net.messages().map(|m| m.name().to_string()).collect();
    assert_eq!(names, vec!["Second"]);
}

#[test]
fn network_level_content_is_preserved_regardless() {
    let net = load_dbc_from_str_filtered(INPUT, &|_, _| false, &|_, _| false).unwrap();

    assert_eq!(net.messages_len(), 0);
    assert_eq!(net.nodes_len(), 2);
    assert_eq!(net.get_node_by_name("ECU1").unwrap().comment(), "kept node");
    assert_eq!(net.value_tables().len(), 1);
    assert_eq!(net.attribute_definitions().len(), 2);
}

#[test]
fn filter_monotonicity() {
    // q accepts a subset of what p accepts; everything kept under q must be
    // kept under p.
    let p = |sig: &str, _: u64| sig != "D";
    let q = |sig: &str, _: u64| sig == "A" || sig == "C";

    let under_p = load_dbc_from_str_filtered(INPUT, &|_, _| true, &p).unwrap();
    let under_q = load_dbc_from_str_filtered(INPUT, &|_, _| true, &q).unwrap();

    for msg_q in under_q.messages() {
        let msg_p = under_p.get_message_by_id(msg_q.id()).unwrap();
        for sig in msg_q.signals(&under_q) {
            assert!(msg_p.get_signal_by_name(&under_p, sig.name()).is_some());
        }
    }
}

#[test]
fn accept_all_filters_match_unfiltered_load() {
    let plain = load_dbc_from_str(INPUT).unwrap();
    let filtered = load_dbc_from_str_filtered(INPUT, &|_, _| true, &|_, _| true).unwrap();

    let render = |net: &can_network::Network| {
        let nodes: Vec<String> = net.nodes().map(|n| format!("{n:?}")).collect();
        let messages: Vec<String> = net
            .messages()
            .map(|m| {
                let signals: Vec<String> =
                    m.signals(net).map(|s| format!("{s:?}")).collect();
                format!("{m:?} {signals:?}")
            })
            .collect();
        format!("{nodes:?} {messages:?} {:?}", net.value_tables())
    };
    assert_eq!(render(&plain), render(&filtered));
}
