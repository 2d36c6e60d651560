//! The lightbox controller.
//!
//! [`Lightbox`] owns everything the overlay needs: the group cache, the open
//! session and the overlay's presentation flags. The application shell turns
//! user input into calls on it and renders whatever it reports.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::group::GroupCache;
use crate::media::{MediaElement, MediaKind};
use crate::settings::Settings;
use crate::transition::{CloseSchedule, CloseStage, Ticket};
use crate::trigger::{GroupKey, Trigger};

/// Presentation flags of the overlay surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub displayed: bool,
    pub visible: bool,
    pub hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// State of the open overlay.
#[derive(Clone, Debug)]
pub struct Session {
    pub group: GroupKey,
    pub entries: Arc<[String]>,
    /// `None` when the opened source is not one of the entries.
    pub current: Option<usize>,
    pub media: MediaElement,
    pub media_shown: bool,
    pub hovered: Option<usize>,
    closing: bool,
}

impl Session {
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_active_thumbnail(&self, index: usize) -> bool {
        self.current == Some(index)
    }

    pub fn thumbnails(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    /// Counter text, `"<index + 1> / <total>"`. An unresolved index reads as 1.
    pub fn counter_text(&self) -> String {
        let display = self.current.map_or(1, |index| index + 1);
        format!("{} / {}", display, self.entries.len())
    }
}

/// What a navigation changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub index: usize,
    /// The element's source changed.
    pub source_changed: bool,
    /// The element had to be recreated because the media kind changed.
    pub recreated: bool,
}

#[derive(Debug)]
pub struct Lightbox {
    settings: Settings,
    groups: GroupCache,
    session: Option<Session>,
    overlay: OverlayState,
    ticket: Ticket,
}

impl Lightbox {
    pub fn new(settings: Settings) -> Self {
        Lightbox {
            settings,
            groups: GroupCache::new(),
            session: None,
            overlay: OverlayState::default(),
            ticket: Ticket::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    /// Ticket of the current overlay lifecycle.
    #[cfg(test)]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn counter_text(&self) -> Option<String> {
        self.session.as_ref().map(Session::counter_text)
    }

    /// Open the overlay on `trigger`.
    ///
    /// Any close still in flight is cancelled. Returns the ticket the fade-in
    /// must present to [`Lightbox::show_media`].
    pub fn open(&mut self, trigger: &Trigger, triggers: &[Trigger]) -> Result<Ticket> {
        let config = &trigger.config;
        let entries = self.groups.resolve(&config.group, triggers);
        if entries.is_empty() {
            return Err(Error::EmptyGroup(config.group.clone()));
        }

        self.ticket = self.ticket.next();
        self.overlay = OverlayState {
            displayed: true,
            visible: true,
            hidden: false,
        };

        let current = entries.iter().position(|entry| entry == &config.source);
        if current.is_none() {
            log::debug!(
                "Source {} is not an entry of group {}, counter starts at 1",
                config.source,
                config.group
            );
        }

        let session = Session {
            group: config.group.clone(),
            entries,
            current,
            media: MediaElement::new(config.source.clone()),
            media_shown: false,
            hovered: None,
            closing: false,
        };
        log::info!(
            "Opened {} ({:?}) in group {}: {}",
            session.media.src,
            session.media.kind,
            session.group,
            session.counter_text()
        );

        self.session = Some(session);
        Ok(self.ticket)
    }

    /// Start the media fade-in. Returns `false` for a stale ticket.
    pub fn show_media(&mut self, ticket: Ticket) -> bool {
        if ticket != self.ticket {
            return false;
        }
        match self.session.as_mut() {
            Some(session) if !session.closing => {
                session.media_shown = true;
                true
            }
            _ => false,
        }
    }

    /// Begin the staged close.
    ///
    /// The media fade-in is removed at once; the returned schedule lists the
    /// remaining stages, to be fed back through [`Lightbox::apply_close_stage`].
    pub fn close(&mut self) -> Result<CloseSchedule> {
        let session = self.session.as_mut().ok_or(Error::NotOpen)?;
        if session.closing {
            return Err(Error::Closing);
        }
        session.closing = true;
        session.media_shown = false;
        session.hovered = None;

        self.ticket = self.ticket.next();
        log::info!("Closing overlay (ticket {})", self.ticket.0);
        Ok(CloseSchedule::new(self.ticket, &self.settings))
    }

    /// Apply one close stage. Returns `false` for a stale ticket.
    pub fn apply_close_stage(&mut self, ticket: Ticket, stage: CloseStage) -> bool {
        if ticket != self.ticket {
            log::trace!("Ignoring stale close stage {:?} (ticket {})", stage, ticket.0);
            return false;
        }
        log::trace!("Close stage {:?}", stage);
        match stage {
            CloseStage::Hide => self.overlay.visible = false,
            CloseStage::MarkHidden => self.overlay.hidden = true,
            CloseStage::Teardown => {
                self.overlay.displayed = false;
                self.session = None;
            }
        }
        true
    }

    /// Move one item forward or back, wrapping at both ends.
    pub fn step(&mut self, direction: Direction) -> Result<Navigation> {
        let session = self.navigable()?;
        let len = session.len();
        if len == 0 {
            return Err(Error::EmptyGroup(session.group.clone()));
        }
        let base = session.current.map_or(-1, |index| index as isize);
        let index = (base + direction.offset() + len as isize).rem_euclid(len as isize) as usize;
        self.select(index)
    }

    /// Select the item at `index`.
    pub fn jump(&mut self, index: usize) -> Result<Navigation> {
        let session = self.navigable()?;
        if index >= session.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: session.len(),
            });
        }
        self.select(index)
    }

    pub fn hover_thumbnail(&mut self, index: usize, hovered: bool) {
        if let Some(session) = self.session.as_mut() {
            if hovered {
                session.hovered = Some(index);
            } else if session.hovered == Some(index) {
                session.hovered = None;
            }
        }
    }

    /// The session, provided it is open and not being torn down.
    fn navigable(&self) -> Result<&Session> {
        let session = self.session.as_ref().ok_or(Error::NotOpen)?;
        if session.closing {
            return Err(Error::Closing);
        }
        Ok(session)
    }

    fn select(&mut self, index: usize) -> Result<Navigation> {
        let session = self.session.as_mut().ok_or(Error::NotOpen)?;
        let src = session.entries[index].clone();
        let kind = MediaKind::classify(&src);

        let source_changed = session.media.src != src;
        let recreated = session.media.kind != kind;
        session.current = Some(index);
        session.media = MediaElement { kind, src };

        log::debug!(
            "Selected {} in group {}{}",
            session.counter_text(),
            session.group,
            if recreated { " (media element recreated)" } else { "" }
        );
        Ok(Navigation {
            index,
            source_changed,
            recreated,
        })
    }
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerConfig;

    fn trigger(id: usize, source: &str, group: Option<&str>, display: Option<&str>) -> Trigger {
        Trigger {
            id,
            element: id,
            label: source.to_string(),
            config: TriggerConfig {
                source: source.to_string(),
                group: group
                    .map(|g| GroupKey::Named(g.to_string()))
                    .unwrap_or(GroupKey::Ungrouped),
                display_source: display.map(str::to_string),
            },
        }
    }

    fn abc() -> Vec<Trigger> {
        vec![
            trigger(0, "A.jpg", Some("x"), None),
            trigger(1, "B.jpg", Some("x"), None),
            trigger(2, "C.jpg", Some("x"), None),
        ]
    }

    fn active_thumbnails(session: &Session) -> Vec<usize> {
        (0..session.len())
            .filter(|&i| session.is_active_thumbnail(i))
            .collect()
    }

    #[test]
    fn opening_middle_trigger_shows_its_position() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();

        lightbox.open(&triggers[1], &triggers).unwrap();

        let session = lightbox.session().unwrap();
        assert_eq!(lightbox.counter_text().as_deref(), Some("2 / 3"));
        let strip: Vec<&str> = session.thumbnails().map(|(_, src)| src).collect();
        assert_eq!(strip, ["A.jpg", "B.jpg", "C.jpg"]);
        assert_eq!(active_thumbnails(session), vec![1]);
        assert_eq!(session.media, MediaElement::new("B.jpg"));
        assert_eq!(
            lightbox.overlay(),
            OverlayState {
                displayed: true,
                visible: true,
                hidden: false
            }
        );
    }

    #[test]
    fn video_with_poster_is_unresolved_but_plays() {
        let triggers = vec![trigger(0, "clip.mp4", None, Some("poster.jpg"))];
        let mut lightbox = Lightbox::default();

        lightbox.open(&triggers[0], &triggers).unwrap();

        let session = lightbox.session().unwrap();
        assert_eq!(&*session.entries, ["poster.jpg"]);
        assert_eq!(session.current, None);
        assert_eq!(session.counter_text(), "1 / 1");
        assert_eq!(session.media.kind, MediaKind::Video);
        assert_eq!(session.media.src, "clip.mp4");
        assert!(active_thumbnails(session).is_empty());
    }

    #[test]
    fn stepping_from_unresolved_starts_at_the_edges() {
        let triggers = vec![
            trigger(0, "clip.mp4", Some("x"), Some("poster.jpg")),
            trigger(1, "b.jpg", Some("x"), None),
            trigger(2, "c.jpg", Some("x"), None),
        ];
        let mut lightbox = Lightbox::default();

        lightbox.open(&triggers[0], &triggers).unwrap();
        assert_eq!(lightbox.step(Direction::Next).unwrap().index, 0);

        lightbox.open(&triggers[0], &triggers).unwrap();
        assert_eq!(lightbox.step(Direction::Previous).unwrap().index, 1);
    }

    #[test]
    fn stepping_n_times_returns_to_start() {
        let triggers = abc();
        for start in 0..triggers.len() {
            let mut lightbox = Lightbox::default();
            lightbox.open(&triggers[start], &triggers).unwrap();

            for _ in 0..triggers.len() {
                lightbox.step(Direction::Next).unwrap();
            }
            assert_eq!(lightbox.session().unwrap().current, Some(start));

            for _ in 0..triggers.len() {
                lightbox.step(Direction::Previous).unwrap();
            }
            assert_eq!(lightbox.session().unwrap().current, Some(start));
        }
    }

    #[test]
    fn step_wraps_at_both_ends() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();

        lightbox.open(&triggers[2], &triggers).unwrap();
        assert_eq!(lightbox.step(Direction::Next).unwrap().index, 0);
        assert_eq!(lightbox.counter_text().as_deref(), Some("1 / 3"));
        assert_eq!(lightbox.step(Direction::Previous).unwrap().index, 2);
        assert_eq!(lightbox.counter_text().as_deref(), Some("3 / 3"));
    }

    #[test]
    fn jump_sets_source_and_single_active_thumbnail() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();

        for i in 0..triggers.len() {
            let navigation = lightbox.jump(i).unwrap();
            let session = lightbox.session().unwrap();
            assert_eq!(navigation.index, i);
            assert_eq!(session.media.src, session.entries[i]);
            assert_eq!(active_thumbnails(session), vec![i]);
            assert_eq!(session.counter_text(), format!("{} / 3", i + 1));
        }
    }

    #[test]
    fn jump_out_of_range_is_rejected_without_change() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[1], &triggers).unwrap();

        let err = lightbox.jump(3).unwrap_err();

        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(lightbox.session().unwrap().current, Some(1));
    }

    #[test]
    fn navigation_requires_an_open_overlay() {
        let mut lightbox = Lightbox::default();
        assert!(matches!(lightbox.step(Direction::Next), Err(Error::NotOpen)));
        assert!(matches!(lightbox.jump(0), Err(Error::NotOpen)));
        assert!(matches!(lightbox.close(), Err(Error::NotOpen)));
    }

    #[test]
    fn navigation_recreates_element_when_kind_changes() {
        let triggers = vec![
            trigger(0, "a.jpg", Some("x"), None),
            trigger(1, "b.webm", Some("x"), None),
        ];
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();

        let navigation = lightbox.step(Direction::Next).unwrap();

        assert!(navigation.source_changed);
        assert!(navigation.recreated);
        assert_eq!(
            lightbox.session().unwrap().media,
            MediaElement {
                kind: MediaKind::Video,
                src: "b.webm".to_string()
            }
        );

        let navigation = lightbox.jump(1).unwrap();
        assert!(!navigation.source_changed);
        assert!(!navigation.recreated);
    }

    #[test]
    fn counter_reads_the_active_group() {
        let triggers = vec![
            trigger(0, "a.jpg", Some("first"), None),
            trigger(1, "b.jpg", Some("second"), None),
            trigger(2, "c.jpg", Some("second"), None),
        ];
        let mut lightbox = Lightbox::default();

        lightbox.open(&triggers[0], &triggers).unwrap();
        assert_eq!(lightbox.counter_text().as_deref(), Some("1 / 1"));

        lightbox.open(&triggers[2], &triggers).unwrap();
        assert_eq!(lightbox.counter_text().as_deref(), Some("2 / 2"));

        lightbox.open(&triggers[0], &triggers).unwrap();
        assert_eq!(lightbox.counter_text().as_deref(), Some("1 / 1"));
    }

    #[test]
    fn fade_in_needs_the_current_ticket() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();

        let first = lightbox.open(&triggers[0], &triggers).unwrap();
        let second = lightbox.open(&triggers[1], &triggers).unwrap();

        assert!(!lightbox.show_media(first));
        assert!(!lightbox.session().unwrap().media_shown);
        assert!(lightbox.show_media(second));
        assert!(lightbox.session().unwrap().media_shown);
    }

    #[test]
    fn close_runs_stages_in_order() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        let ticket = lightbox.open(&triggers[0], &triggers).unwrap();
        lightbox.show_media(ticket);

        let schedule = lightbox.close().unwrap();

        // Stage one happens immediately.
        assert!(!lightbox.session().unwrap().media_shown);
        assert!(lightbox.overlay().visible);

        let stages: Vec<CloseStage> = schedule.stages.iter().map(|(_, stage)| *stage).collect();
        assert_eq!(
            stages,
            vec![CloseStage::Hide, CloseStage::MarkHidden, CloseStage::Teardown]
        );

        assert!(lightbox.apply_close_stage(schedule.ticket, CloseStage::Hide));
        assert_eq!(
            lightbox.overlay(),
            OverlayState {
                displayed: true,
                visible: false,
                hidden: false
            }
        );

        assert!(lightbox.apply_close_stage(schedule.ticket, CloseStage::MarkHidden));
        assert!(lightbox.overlay().hidden);
        assert!(lightbox.is_open());

        assert!(lightbox.apply_close_stage(schedule.ticket, CloseStage::Teardown));
        assert!(!lightbox.overlay().displayed);
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.counter_text(), None);
    }

    #[test]
    fn navigation_is_rejected_while_closing() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();
        lightbox.close().unwrap();

        assert!(matches!(lightbox.step(Direction::Next), Err(Error::Closing)));
        assert!(matches!(lightbox.jump(2), Err(Error::Closing)));
        let session = lightbox.session().unwrap();
        assert_eq!(session.current, Some(0));
        assert_eq!(session.media.src, "A.jpg");
    }

    #[test]
    fn second_close_while_closing_is_rejected() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();

        lightbox.close().unwrap();

        assert!(matches!(lightbox.close(), Err(Error::Closing)));
    }

    #[test]
    fn reopening_cancels_a_pending_close() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();
        let schedule = lightbox.close().unwrap();
        assert!(lightbox.apply_close_stage(schedule.ticket, CloseStage::Hide));

        lightbox.open(&triggers[2], &triggers).unwrap();

        for (_, stage) in &schedule.stages {
            assert!(!lightbox.apply_close_stage(schedule.ticket, *stage));
        }
        assert!(lightbox.overlay().visible);
        assert!(lightbox.overlay().displayed);
        assert_eq!(lightbox.counter_text().as_deref(), Some("3 / 3"));
    }

    #[test]
    fn hover_is_independent_of_active_thumbnail() {
        let triggers = abc();
        let mut lightbox = Lightbox::default();
        lightbox.open(&triggers[0], &triggers).unwrap();

        lightbox.hover_thumbnail(2, true);
        let session = lightbox.session().unwrap();
        assert_eq!(session.hovered, Some(2));
        assert_eq!(active_thumbnails(session), vec![0]);

        lightbox.hover_thumbnail(1, false);
        assert_eq!(lightbox.session().unwrap().hovered, Some(2));
        lightbox.hover_thumbnail(2, false);
        assert_eq!(lightbox.session().unwrap().hovered, None);
    }
}
