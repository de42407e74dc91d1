use waypoint_graph::reachability::{ancestors, can_reach};
use waypoint_graph::{state_set, GraphError, StateId, StateTransitions, TransitionGraphIndex};

/// Home -> Menu -> Settings, Menu -> Search, and a Dialog that can be
/// closed back to whatever it covers.
const DEFINITIONS: &str = r#"[
    {
        "state_id": 1,
        "transitions": [ { "id": "open-menu", "activate": [2] } ]
    },
    {
        "state_id": 2,
        "transitions": [
            { "id": "open-settings", "activate": [3], "stays_visible": "false" },
            { "id": "open-search", "activate": [4], "stays_visible": "true" }
        ],
        "finish": { "id": "menu-visible" }
    },
    {
        "state_id": 3,
        "transitions": [ { "id": "open-dialog", "activate": [5] } ]
    },
    {
        "state_id": 5,
        "hidden": [3],
        "transitions": [ { "id": "close-dialog", "activate": [-2], "exit": [5] } ]
    }
]"#;

#[test]
fn index_builds_from_json_definitions() {
    let index = TransitionGraphIndex::from_json(DEFINITIONS).unwrap();

    assert_eq!(index.predecessors(StateId(2)), state_set([1i64]));
    assert_eq!(index.predecessors(StateId(3)), state_set([2i64]));
    assert_eq!(index.successors(StateId(2)), state_set([3i64, 4]));
    assert_eq!(
        index.transition(StateId(2), StateId(4)).map(|t| t.id.clone()),
        Some("open-search".to_string())
    );
}

#[test]
fn transitions_into_previous_are_not_predecessors() {
    let index = TransitionGraphIndex::from_json(DEFINITIONS).unwrap();

    // Dialog activates PREVIOUS; PREVIOUS itself is never a search node.
    assert_eq!(index.predecessors(StateId::PREVIOUS), state_set([5i64]));
    assert!(index.predecessors(StateId(3)).len() == 1);
}

#[test]
fn opening_a_dialog_makes_it_a_way_back_to_the_hidden_state() {
    let mut index = TransitionGraphIndex::from_json(DEFINITIONS).unwrap();
    let definitions: Vec<StateTransitions> = serde_json::from_str(DEFINITIONS).unwrap();
    let dialog = definitions
        .iter()
        .find(|d| d.state_id == StateId(5))
        .unwrap();

    index.add_hidden(dialog.state_id, &dialog.hidden);
    assert_eq!(index.predecessors(StateId(3)), state_set([2i64, 5]));

    index.remove_hidden(dialog.state_id, &dialog.hidden);
    assert_eq!(index.predecessors(StateId(3)), state_set([2i64]));
}

#[test]
fn reachability_over_parsed_graph() {
    let index = TransitionGraphIndex::from_json(DEFINITIONS).unwrap();

    assert_eq!(ancestors(&index, StateId(5)), state_set([1i64, 2, 3]));
    assert!(can_reach(&index, &state_set([1i64]), StateId(4)));
    assert!(!can_reach(&index, &state_set([4i64]), StateId(1)));
}

#[test]
fn malformed_json_is_reported() {
    let err = TransitionGraphIndex::from_json("[{ \"transitions\": [] }]").unwrap_err();
    assert!(matches!(err, GraphError::Json(_)));
    assert!(err.to_string().starts_with("invalid transition definitions"));
}
