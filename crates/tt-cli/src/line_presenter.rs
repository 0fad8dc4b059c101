use std::io::{BufRead, Write};

use tt_core::TheatreError;
use tt_runtime::{Notice, Presenter, SaveRequest, SceneView, SessionOutcome, SlotSummary};
use tt_save::format_playtime;

use crate::map_play_io;

const QUIT_WORDS: [&str; 3] = ["q", "quit", ":quit"];

/// Plain-text presenter over any reader/writer pair.
pub(crate) struct LinePresenter<'io> {
    reader: &'io mut dyn BufRead,
    writer: &'io mut dyn Write,
}

impl<'io> LinePresenter<'io> {
    pub(crate) fn new(reader: &'io mut dyn BufRead, writer: &'io mut dyn Write) -> Self {
        Self { reader, writer }
    }

    pub(crate) fn say(&mut self, text: &str) -> Result<(), TheatreError> {
        writeln!(self.writer, "{text}").map_err(map_play_io)
    }

    pub(crate) fn announce_outcome(
        &mut self,
        outcome: &SessionOutcome,
    ) -> Result<(), TheatreError> {
        match outcome {
            SessionOutcome::Ending(scene_id) => {
                self.say(&format!("Thanks for playing. You reached `{scene_id}`."))
            }
            SessionOutcome::DeadEnd(_) => self.say("Thanks for playing."),
        }
    }

    /// Reads one line; end of input and quit words count as cancellation.
    fn read_answer(&mut self, prefix: &str) -> Result<String, TheatreError> {
        let raw = prompt_input_from(prefix, &mut *self.reader, &mut *self.writer)?
            .ok_or_else(TheatreError::cancelled)?;
        let answer = raw.trim().to_string();
        if QUIT_WORDS.contains(&answer.as_str()) {
            return Err(TheatreError::cancelled());
        }
        Ok(answer)
    }
}

impl Presenter for LinePresenter<'_> {
    fn show_title(&mut self, title: &str, subtitle: &str) -> Result<(), TheatreError> {
        self.say(&format!("=== {title} ==="))?;
        if !subtitle.is_empty() {
            self.say(subtitle)?;
        }
        self.say("(type q to quit)")
    }

    fn render_scene(&mut self, view: &SceneView) -> Result<(), TheatreError> {
        self.say("")?;
        if let Some(art) = &view.content.art {
            self.say(art)?;
        }
        if !view.content.description.is_empty() {
            self.say(&view.content.description)?;
        }
        for line in &view.content.dialogue {
            self.say(&format!("{}: \"{}\"", line.speaker, line.text))?;
        }
        if view.is_ending {
            self.say("")?;
            self.say("*** THE END ***")?;
        }
        Ok(())
    }

    fn select(&mut self, labels: &[String]) -> Result<usize, TheatreError> {
        self.say("")?;
        for (index, label) in labels.iter().enumerate() {
            self.say(&format!("  [{}] {}", index + 1, label))?;
        }
        loop {
            let answer = self.read_answer("> ")?;
            match answer.parse::<usize>() {
                Ok(number) if number >= 1 => return Ok(number - 1),
                _ => self.say(&format!("Please enter a number from 1 to {}.", labels.len()))?,
            }
        }
    }

    fn choose_save_slot(
        &mut self,
        slots: &[SlotSummary],
    ) -> Result<Option<SaveRequest>, TheatreError> {
        self.say("")?;
        self.say("=== SAVE GAME ===")?;
        for summary in slots {
            match &summary.metadata {
                Some(metadata) => {
                    self.say(&format!(
                        "{}. {} - {}",
                        summary.slot, metadata.save_name, metadata.scene_description
                    ))?;
                    let stamp = metadata.timestamp.get(..19).unwrap_or(&metadata.timestamp);
                    self.say(&format!(
                        "   {stamp} | Playtime: {}",
                        format_playtime(metadata.playtime)
                    ))?;
                }
                None => self.say(&format!("{}. [Empty Slot]", summary.slot))?,
            }
        }
        self.say("0. Cancel")?;

        let slot = loop {
            let answer = self.read_answer("Select save slot: ")?;
            match answer.parse::<u32>() {
                Ok(0) => return Ok(None),
                Ok(slot) if slots.iter().any(|summary| summary.slot == slot) => break slot,
                Ok(slot) => self.notify(&Notice::InvalidSlot { slot })?,
                Err(_) => self.say("Please enter a slot number.")?,
            }
        };
        let name = self.read_answer("Save name (blank for default): ")?;
        Ok(Some(SaveRequest {
            slot,
            name: (!name.is_empty()).then_some(name),
        }))
    }

    fn notify(&mut self, notice: &Notice) -> Result<(), TheatreError> {
        let message = match notice {
            Notice::InvalidSelection {
                selected,
                available,
            } => format!(
                "There is no option {}. Pick 1 to {available}.",
                selected + 1
            ),
            Notice::InvalidSlot { slot } => format!("Slot {slot} is not a save slot."),
            Notice::Saved { slot, name } => format!("Game saved to slot {slot} ({name})."),
            Notice::SaveFailed { slot, reason } => {
                format!("Failed to save to slot {slot}: {reason}")
            }
            Notice::VersionWarning(warning) => format!("Warning: {warning}"),
            Notice::LoadFailed { slot, reason } => {
                format!("Could not load slot {slot}: {reason}. Starting a new story.")
            }
            Notice::StoryUnavailable { story_id } => format!(
                "This save was created for an unavailable story ({story_id}). \
                 Starting a new story."
            ),
            Notice::DeadEnd { .. } => {
                "No choices available. The story ended unexpectedly.".to_string()
            }
        };
        self.say(&message)
    }
}

/// `None` at end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, TheatreError> {
    write!(writer, "{prefix}").map_err(map_play_io)?;
    writer.flush().map_err(map_play_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_play_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
