#![cfg(unix)]

use std::process::Command;

use nanograph::system::Sampler;

#[test]
fn children_sum_survives_child_exit() {
    let mut child_a = Command::new("sleep").arg("30").spawn().expect("spawn sleep");
    let mut child_b = Command::new("sleep").arg("30").spawn().expect("spawn sleep");

    let mut sampler = Sampler::new();
    let own_pid = std::process::id();

    let with_children = sampler.process_memory(own_pid, true).unwrap();
    assert!(with_children.memory_mb > 0.0);

    // One child goes away; the next query must still succeed, summing
    // only the survivors.
    child_a.kill().unwrap();
    child_a.wait().unwrap();

    let after_exit = sampler.process_memory(own_pid, true).unwrap();
    assert!(after_exit.memory_mb > 0.0);

    child_b.kill().unwrap();
    child_b.wait().unwrap();
}

#[test]
fn exited_child_pid_reports_sentinel() {
    let mut child = Command::new("true").spawn().expect("spawn true");
    let pid = child.id();
    child.wait().unwrap();

    let mut sampler = Sampler::new();
    let result = sampler.process_memory(pid, false).unwrap();
    assert_eq!(result.memory_mb, -1.0);
}
