//! Quick benchmark to verify frame rendering and reducer throughput

use serde_json::json;
use std::time::Instant;
use watchboard::dashboard::{apply, render, ServeInfo, SessionInfo, SessionMode, SessionState};
use watchboard::event::{DashboardEvent, StatusLabel};
use watchboard::WorkerConfig;

fn main() {
    let session = SessionInfo::new(
        "Snowpack",
        SessionMode::Serve(ServeInfo {
            port: 8080,
            ips: vec!["192.168.0.4".into(), "10.0.0.2".into()],
            start_time_ms: 42,
        }),
    );

    println!("Frame Rendering Performance Test");
    println!("================================\n");

    for worker_count in [4usize, 32, 256] {
        let mut state = SessionState::with_workers(
            (0..worker_count).map(|i| WorkerConfig::new(format!("build:{}", i))),
        );
        for i in 0..worker_count {
            let id = format!("build:{}", i);
            apply(
                &mut state,
                DashboardEvent::WorkerOutput {
                    id: id.clone(),
                    msg: "compiled 12 files\nwarning: unused import\n".repeat(4),
                },
            );
            if i % 3 == 0 {
                apply(
                    &mut state,
                    DashboardEvent::WorkerCompleted { id, error: None },
                );
            }
        }

        let iterations = 10_000u32;
        let start = Instant::now();
        let mut bytes = 0usize;
        for _ in 0..iterations {
            bytes += render(&state, &session).text().len();
        }
        let elapsed = start.elapsed();

        println!("Workers: {}", worker_count);
        println!("  Time for {} renders: {:?}", iterations, elapsed);
        println!("  Per frame: {:?}", elapsed / iterations);
        println!("  Frame size: {} bytes\n", bytes / iterations as usize);
    }

    println!("Reducer Throughput");
    println!("==================\n");

    let mut state = SessionState::with_workers((0..16).map(|i| WorkerConfig::new(format!("w{}", i))));
    let events: Vec<DashboardEvent> = (0..16)
        .flat_map(|i| {
            let id = format!("w{}", i);
            [
                DashboardEvent::WorkerStatusUpdate {
                    id: id.clone(),
                    state: Some(StatusLabel::Styled("bundling".into(), "yellow".into())),
                },
                DashboardEvent::info([json!("%s rebuilt in %dms"), json!(id.clone()), json!(i)]),
                DashboardEvent::WorkerReset { id },
            ]
        })
        .collect();

    let rounds = 10_000u32;
    let start = Instant::now();
    for _ in 0..rounds {
        for event in &events {
            apply(&mut state, event.clone());
        }
        apply(&mut state, DashboardEvent::SessionStarted);
    }
    let elapsed = start.elapsed();
    let applied = rounds * (events.len() as u32 + 1);

    println!("  Events applied: {}", applied);
    println!("  Total: {:?}", elapsed);
    println!("  Per event: {:?}", elapsed / applied);
}
