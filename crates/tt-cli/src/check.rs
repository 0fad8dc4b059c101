use tt_core::TheatreError;
use tt_story::{check_connectivity, ConnectivityReport, Story};

use crate::{json_text, load_story, CheckArgs};

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, TheatreError> {
    let loaded = load_story(args.story.as_deref(), None)?;
    let report = check_connectivity(&loaded.story);
    for line in report_lines(&loaded.story, &report) {
        println!("{line}");
    }
    Ok(if report.is_sound() { 0 } else { 1 })
}

pub(crate) fn report_lines(story: &Story, report: &ConnectivityReport) -> Vec<String> {
    let mut lines = vec![
        format!("STORY:{}|{}", story.id(), json_text(story.title())),
        format!("SCENES:{}", story.scene_count()),
        format!("REACHABLE:{}", report.reachable.len()),
    ];
    lines.extend(report.endings.iter().map(|id| format!("ENDING:{id}")));
    lines.extend(
        report
            .missing_targets
            .iter()
            .map(|missing| format!("MISSING_TARGET:{}|{}", missing.from_scene, missing.target)),
    );
    lines.extend(report.choiceless.iter().map(|id| format!("CHOICELESS:{id}")));
    lines.extend(report.unreachable.iter().map(|id| format!("UNREACHABLE:{id}")));
    lines.push(format!("SOUND:{}", report.is_sound()));
    lines
}
