use tt_runtime::{Boundary, SceneView};

/// JSON string literal for `text`.
pub(crate) fn json_text(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

pub(crate) fn boundary_lines(boundary: &Boundary, state_out: Option<&str>) -> Vec<String> {
    let mut lines = vec!["RESULT:OK".to_string()];
    lines.push(
        match boundary {
            Boundary::Choices { .. } => "EVENT:CHOICES",
            Boundary::Ending { .. } => "EVENT:ENDING",
            Boundary::DeadEnd { .. } => "EVENT:DEAD_END",
        }
        .to_string(),
    );

    let view = boundary.view();
    lines.push(format!("SCENE:{}", view.scene_id));
    lines.extend(scene_texts(view).iter().map(|text| format!("TEXT_JSON:{}", json_text(text))));

    if let Boundary::Choices { choices, .. } = boundary {
        for choice in choices {
            lines.push(format!("CHOICE:{}|{}", choice.index, json_text(&choice.text)));
        }
    }

    lines.push(format!("STATE_OUT:{}", state_out.unwrap_or("NONE")));
    lines
}

pub(crate) fn emit_boundary(boundary: &Boundary, state_out: Option<&str>) {
    for line in boundary_lines(boundary, state_out) {
        println!("{line}");
    }
}

fn scene_texts(view: &SceneView) -> Vec<String> {
    let mut texts = Vec::new();
    if !view.content.description.is_empty() {
        texts.push(view.content.description.clone());
    }
    for line in &view.content.dialogue {
        texts.push(format!("{}: \"{}\"", line.speaker, line.text));
    }
    texts
}
