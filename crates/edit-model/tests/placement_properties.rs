use cutroom_edit_model::{
    AssetId, Clip, EditGraph, IngestedMedia, MediaAsset, MediaOrigin,
};
use proptest::prelude::*;

fn graph_with_long_asset() -> (EditGraph, AssetId) {
    let mut graph = EditGraph::new();
    let id = graph
        .add_asset(MediaAsset::from_ingested(
            "source.mp4",
            "source.mp4",
            MediaOrigin::Local,
            IngestedMedia {
                asset_id: AssetId::new("source"),
                durable_locator: Some("/static/uploads/source.mp4".to_string()),
                duration_secs: 0.0,
                thumbnail: None,
            },
        ))
        .unwrap();
    (graph, id)
}

fn assert_no_overlap(clips: &[Clip]) {
    for (i, a) in clips.iter().enumerate() {
        assert!(
            ((a.timeline_end - a.timeline_start) - a.duration()).abs() < 1e-9,
            "timeline length drifted from trim length"
        );
        for b in &clips[i + 1..] {
            if a.track == b.track {
                assert!(
                    a.timeline_end <= b.timeline_start || b.timeline_end <= a.timeline_start,
                    "clips overlap on track {}: [{}, {}) vs [{}, {})",
                    a.track,
                    a.timeline_start,
                    a.timeline_end,
                    b.timeline_start,
                    b.timeline_end
                );
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Place { duration: f64 },
    PlaceAt { duration: f64, track: u32, start: f64 },
    Move { pick: usize, track: u32, start: f64 },
    Remove { pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.1f64..30.0).prop_map(|duration| Op::Place { duration }),
        (0.1f64..30.0, 0u32..4, 0.0f64..120.0)
            .prop_map(|(duration, track, start)| Op::PlaceAt { duration, track, start }),
        (any::<usize>(), 0u32..4, -5.0f64..120.0)
            .prop_map(|(pick, track, start)| Op::Move { pick, track, start }),
        any::<usize>().prop_map(|pick| Op::Remove { pick }),
    ]
}

proptest! {
    #[test]
    fn auto_placement_never_overlaps(durations in prop::collection::vec(0.01f64..60.0, 1..40)) {
        let (mut graph, asset) = graph_with_long_asset();
        for duration in durations {
            graph.add_clip(&asset, 0.0, duration).unwrap();
            assert_no_overlap(graph.clips());
        }
    }

    #[test]
    fn mixed_edits_never_overlap(ops in prop::collection::vec(op(), 1..60)) {
        let (mut graph, asset) = graph_with_long_asset();
        for op in ops {
            match op {
                Op::Place { duration } => {
                    graph.add_clip(&asset, 0.0, duration).unwrap();
                }
                Op::PlaceAt { duration, track, start } => {
                    let _ = graph.add_clip_at(&asset, 0.0, duration, track, start);
                }
                Op::Move { pick, track, start } => {
                    if graph.clips().is_empty() {
                        continue;
                    }
                    let id = graph.clips()[pick % graph.clips().len()].id;
                    let before = graph.clone();
                    if graph.move_clip(id, track, start).is_err() {
                        prop_assert_eq!(&graph, &before);
                    }
                }
                Op::Remove { pick } => {
                    if graph.clips().is_empty() {
                        continue;
                    }
                    let id = graph.clips()[pick % graph.clips().len()].id;
                    graph.remove_clip(id).unwrap();
                }
            }
            assert_no_overlap(graph.clips());
        }
    }
}
