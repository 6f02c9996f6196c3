use crate::{
    Res, info,
    scraper::ScraperClient,
    spotify::SpotifyClient,
    success,
    types::{Episode, SpotifyTrack, SyncTableRow, TrackMention},
    warning,
};

/// What happened to a single track mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Search returned nothing usable.
    NotFound,
    AlreadyPresent(String),
    Added(String),
    /// Absent from the playlist, but left alone because of a dry run.
    WouldAdd(String),
}

impl TrackOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TrackOutcome::NotFound => "not found",
            TrackOutcome::AlreadyPresent(_) => "already present",
            TrackOutcome::Added(_) => "added",
            TrackOutcome::WouldAdd(_) => "would add",
        }
    }

    pub fn track_id(&self) -> Option<&str> {
        match self {
            TrackOutcome::NotFound => None,
            TrackOutcome::AlreadyPresent(id)
            | TrackOutcome::Added(id)
            | TrackOutcome::WouldAdd(id) => Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackResult {
    pub mention: TrackMention,
    pub matched: Option<SpotifyTrack>,
    pub outcome: TrackOutcome,
}

#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub episode: Episode,
    pub tracks: Vec<TrackResult>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub episodes: Vec<EpisodeReport>,
}

impl SyncReport {
    pub fn mentions(&self) -> usize {
        self.episodes.iter().map(|e| e.tracks.len()).sum()
    }

    pub fn count(&self, pred: impl Fn(&TrackOutcome) -> bool) -> usize {
        self.episodes
            .iter()
            .flat_map(|e| e.tracks.iter())
            .filter(|t| pred(&t.outcome))
            .count()
    }

    pub fn added(&self) -> usize {
        self.count(|o| matches!(o, TrackOutcome::Added(_)))
    }

    pub fn rows(&self) -> Vec<SyncTableRow> {
        self.episodes
            .iter()
            .flat_map(|e| {
                e.tracks.iter().map(move |t| SyncTableRow {
                    episode: e.episode.title.clone(),
                    artist: t.mention.artist().unwrap_or("-").to_string(),
                    song: t.mention.song.clone(),
                    spotify_id: t.outcome.track_id().unwrap_or("-").to_string(),
                    status: t.outcome.label().to_string(),
                })
            })
            .collect()
    }
}

/// Episode source → dedupe → track source → search → membership check → append.
///
/// Strictly sequential. The first failing call aborts the whole run; there
/// is no per-episode recovery.
pub struct PlaylistSync {
    scraper: ScraperClient,
    spotify: SpotifyClient,
    playlist_id: String,
    dry_run: bool,
}

impl PlaylistSync {
    pub fn new(scraper: ScraperClient, spotify: SpotifyClient, playlist_id: impl Into<String>) -> Self {
        PlaylistSync {
            scraper,
            spotify,
            playlist_id: playlist_id.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the whole pipeline over every unique episode.
    ///
    /// Episodes are fetched once and deduplicated by link, then each one is
    /// handled by [`PlaylistSync::sync_episode`] in listing order. Tracks are
    /// searched one at a time and only appended when the first page of the
    /// playlist does not already contain them.
    ///
    /// # Returns
    ///
    /// A [`SyncReport`] with one [`EpisodeReport`] per episode and a
    /// [`TrackOutcome`] per mention. Nothing is partial: a report is only
    /// returned when every episode was processed.
    ///
    /// # Errors
    ///
    /// - [`Error::Provider`](crate::Error::Provider) when the scraping provider
    ///   or a Spotify endpoint answers with a non-success status
    /// - [`Error::AuthenticationFailed`](crate::Error::AuthenticationFailed) or
    ///   [`Error::StateMismatch`](crate::Error::StateMismatch) when a Spotify
    ///   login is required and does not complete
    /// - [`Error::Http`](crate::Error::Http) or [`Error::Parse`](crate::Error::Parse)
    ///   for transport and decoding failures
    ///
    /// The first error aborts the run. Tracks appended before it stay in the
    /// playlist.
    ///
    /// # Example
    ///
    /// ```
    /// let sync = PlaylistSync::new(scraper, spotify, "playlist-id").dry_run(true);
    /// let report = sync.run().await?;
    /// println!("{} of {} mentions would be added", report.count(|o| o.track_id().is_some()), report.mentions());
    /// ```
    pub async fn run(&self) -> Res<SyncReport> {
        let episodes = self.scraper.list_unique_episodes().await?;
        info!("Found {} unique episodes", episodes.len());

        let mut report = SyncReport::default();
        for episode in episodes {
            report.episodes.push(self.sync_episode(episode).await?);
        }
        Ok(report)
    }

    /// Syncs every mention of one episode, in the order the provider lists them.
    pub async fn sync_episode(&self, episode: Episode) -> Res<EpisodeReport> {
        info!("Episode: {}", episode.title);
        info!("Link: {}", episode.link);

        let mentions = self.scraper.find_music_played(&episode.link).await?;
        let mut tracks = Vec::with_capacity(mentions.len());
        for mention in mentions {
            tracks.push(self.sync_track(mention).await?);
        }

        Ok(EpisodeReport { episode, tracks })
    }

    /// Adds the best match for one mention unless the playlist already has it.
    pub async fn sync_track(&self, mention: TrackMention) -> Res<TrackResult> {
        info!(
            " - {} - {}",
            mention.artist().unwrap_or("unknown artist"),
            mention.song
        );

        let candidates = self
            .spotify
            .search_track(&mention.song, mention.artist())
            .await?;
        let Some(best) = candidates.into_iter().next() else {
            warning!("No Spotify match for {}", mention.song);
            return Ok(TrackResult {
                mention,
                matched: None,
                outcome: TrackOutcome::NotFound,
            });
        };

        let Some(track_id) = best.track_id() else {
            warning!("Spotify match for {} has no track link", mention.song);
            return Ok(TrackResult {
                mention,
                matched: Some(best),
                outcome: TrackOutcome::NotFound,
            });
        };
        info!("Spotify ID: {}", track_id);

        let outcome = if self
            .spotify
            .is_track_in_playlist(&track_id, &self.playlist_id)
            .await?
        {
            TrackOutcome::AlreadyPresent(track_id)
        } else if self.dry_run {
            info!("Would add to playlist: {}", self.playlist_id);
            TrackOutcome::WouldAdd(track_id)
        } else {
            self.spotify
                .add_track_to_playlist(&track_id, &self.playlist_id)
                .await?;
            success!("Added to playlist: {}", self.playlist_id);
            TrackOutcome::Added(track_id)
        };

        Ok(TrackResult {
            mention,
            matched: Some(best),
            outcome,
        })
    }
}
