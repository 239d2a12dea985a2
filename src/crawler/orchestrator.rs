//! Crawl orchestrator - the alphabet → keyword → page state machine
//!
//! The orchestrator owns the checkpoint and the output sink. It walks the
//! directory one unit at a time and persists the cursor after every unit so
//! a restart continues where the last run stopped:
//!
//! | Completed unit | Cursor saved            |
//! |----------------|-------------------------|
//! | page `p`       | `(letter, k, p + 1)`    |
//! | keyword `k`    | `(letter, k + 1, 1)`    |
//! | letter         | `(next letter, 1, 1)`   |
//!
//! Fetch exhaustion is absorbed by skipping the smallest enclosing unit (a
//! detail page loses only its phones, a keyword page loses its listings, an
//! unresolvable keyword is skipped). Storage and output errors abort the run.

use crate::config::TraversalConfig;
use crate::crawler::{RenderedPage, Renderer, ResilientFetcher};
use crate::extract::{KeywordCategory, ListingExtractor, PaginationIndex, PhoneExtractor};
use crate::output::{ListingRecord, RecordSink};
use crate::state::{next_letter, Checkpoint, CrawlState};
use crate::storage::CheckpointStore;
use crate::CrawlerError;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_crawled: u64,
    pub pages_skipped: u64,
    pub keywords_skipped: u64,
    pub alphabets_skipped: u64,
    pub records_written: u64,
    pub phone_lookups_failed: u64,
}

/// Drives the traversal and owns the checkpoint and output sink
pub struct CrawlOrchestrator<R, C, O> {
    fetcher: ResilientFetcher<R>,
    index: PaginationIndex,
    store: C,
    sink: O,
    traversal: TraversalConfig,
    /// Cursor as loaded when the run started
    resume: Checkpoint,
    /// Cursor as last persisted
    checkpoint: Checkpoint,
    /// Keywords of the letter being traversed
    categories: Vec<KeywordCategory>,
    /// First page of a keyword, fetched while resolving it
    prefetched: Option<RenderedPage>,
    stats: CrawlStats,
}

impl<R, C, O> CrawlOrchestrator<R, C, O>
where
    R: Renderer,
    C: CheckpointStore,
    O: RecordSink,
{
    /// Creates an orchestrator and reads the resume cursor
    ///
    /// # Arguments
    ///
    /// * `reset` - Discard prior progress and start from (`A`, 1, 1)
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOrchestrator)` - Ready to run
    /// * `Err(CrawlerError::ConfigurationMissing)` - No checkpoint and no reset
    /// * `Err(CrawlerError::PersistenceUnavailable)` - Checkpoint unreadable
    pub fn new(
        fetcher: ResilientFetcher<R>,
        index: PaginationIndex,
        mut store: C,
        sink: O,
        traversal: TraversalConfig,
        reset: bool,
    ) -> Result<Self, CrawlerError> {
        let checkpoint = if reset {
            tracing::info!("Resetting checkpoint, ignoring previous progress");
            store.reset()?
        } else if store.exists() {
            store.load()?
        } else {
            return Err(CrawlerError::ConfigurationMissing {
                path: store.location(),
            });
        };

        Ok(Self {
            fetcher,
            index,
            store,
            sink,
            traversal,
            resume: checkpoint,
            checkpoint,
            categories: Vec::new(),
            prefetched: None,
            stats: CrawlStats::default(),
        })
    }

    /// Runs the traversal until every letter in range has been visited
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlerError> {
        tracing::info!("Starting crawl at {}", self.resume);

        let mut state = self.initial_state();
        while !state.is_done() {
            state = self.step(state).await?;
        }

        tracing::info!("Concluding crawling the entire website");
        Ok(self.stats.clone())
    }

    /// Performs one state transition
    async fn step(&mut self, state: CrawlState) -> Result<CrawlState, CrawlerError> {
        match state {
            CrawlState::AtAlphabet(letter) => self.enter_alphabet(letter).await,
            CrawlState::AtKeyword(letter, ordinal) => self.enter_keyword(letter, ordinal).await,
            CrawlState::AtPage(letter, ordinal, page) => {
                self.enter_page(letter, ordinal, page).await
            }
            CrawlState::Done => Ok(CrawlState::Done),
        }
    }

    /// The cursor as last persisted
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Releases the checkpoint store and the sink
    pub fn into_parts(self) -> (C, O) {
        (self.store, self.sink)
    }

    fn initial_state(&self) -> CrawlState {
        match self.traversal.last_visited_letter() {
            Some(last) if self.resume.alphabet <= last => CrawlState::AtAlphabet(self.resume.alphabet),
            _ => {
                tracing::info!("Checkpoint is past the traversal range, nothing to crawl");
                CrawlState::Done
            }
        }
    }

    async fn enter_alphabet(&mut self, letter: char) -> Result<CrawlState, CrawlerError> {
        let keyword_start = if letter == self.resume.alphabet {
            self.checkpoint = self.resume;
            self.resume.keyword
        } else {
            self.checkpoint = Checkpoint::new(letter, 1, 1);
            1
        };
        self.save()?;

        match self.index.categories_for(&self.fetcher, letter).await {
            Ok(categories) => {
                self.categories = categories;
                Ok(CrawlState::AtKeyword(letter, keyword_start))
            }
            Err(e) => {
                let e = absorb(e)?;
                tracing::info!(
                    "Network failure while listing keywords for alphabet {}, skipping: {}",
                    letter,
                    e
                );
                self.stats.alphabets_skipped += 1;
                self.categories.clear();
                self.finish_alphabet(letter)
            }
        }
    }

    async fn enter_keyword(
        &mut self,
        letter: char,
        ordinal: usize,
    ) -> Result<CrawlState, CrawlerError> {
        let Some(category) = self.category(ordinal).cloned() else {
            return self.finish_alphabet(letter);
        };

        let page_start = if letter == self.resume.alphabet && ordinal == self.resume.keyword {
            self.resume.page
        } else {
            1
        };
        self.checkpoint = Checkpoint::new(letter, ordinal, page_start);
        self.save()?;

        tracing::info!(
            "Keyword {} ({}) has {} entries, page count for this keyword is: {}",
            ordinal,
            category.name,
            category.total_entries,
            category.page_count
        );

        if page_start > category.page_count {
            return self.finish_keyword(letter, ordinal);
        }

        match self.resolve_keyword(&category, page_start).await {
            Ok(page) => {
                self.prefetched = Some(page);
                Ok(CrawlState::AtPage(letter, ordinal, page_start))
            }
            Err(e) => {
                let e = absorb(e)?;
                tracing::info!("{}, skipping keyword", e);
                self.stats.keywords_skipped += 1;
                self.finish_keyword(letter, ordinal)
            }
        }
    }

    async fn enter_page(
        &mut self,
        letter: char,
        ordinal: usize,
        page: usize,
    ) -> Result<CrawlState, CrawlerError> {
        let Some(category) = self.category(ordinal).cloned() else {
            return self.finish_alphabet(letter);
        };

        tracing::info!(
            "Crawling for alphabet: {}, keyword: {}, page_no: {}",
            letter,
            category.name,
            page
        );

        let document = match self.prefetched.take() {
            Some(document) => Ok(document),
            None => self.fetcher.fetch(&category.page_url(page)).await,
        };

        match document {
            Ok(document) => {
                let records = self.crawl_listings(&document).await?;
                self.sink.write_batch(&records)?;
                self.stats.pages_crawled += 1;
                self.stats.records_written += records.len() as u64;
            }
            Err(e) => {
                let e = absorb(e)?;
                tracing::info!("Network failure while crawling page, skipping: {}", e);
                self.stats.pages_skipped += 1;
            }
        }

        self.checkpoint = Checkpoint::new(letter, ordinal, page).with_next_page();
        self.save()?;

        if page >= category.page_count {
            self.finish_keyword(letter, ordinal)
        } else {
            Ok(CrawlState::AtPage(letter, ordinal, page + 1))
        }
    }

    /// Fetches the first page to crawl of a keyword
    async fn resolve_keyword(
        &self,
        category: &KeywordCategory,
        page: usize,
    ) -> Result<RenderedPage, CrawlerError> {
        let url = category.page_url(page);
        self.fetcher
            .fetch(&url)
            .await
            .map_err(|_| CrawlerError::CategoryResolutionFailed {
                letter: category.alphabet,
                ordinal: category.ordinal,
                url,
            })
    }

    /// Builds the records of one keyword page, looking up phones on detail pages
    async fn crawl_listings(
        &mut self,
        page: &RenderedPage,
    ) -> Result<Vec<ListingRecord>, CrawlerError> {
        let candidates = ListingExtractor::extract_page(page);
        let mut records = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.into_iter().enumerate() {
            tracing::info!("Crawling {} entry on this page", index + 1);

            let phones = match &candidate.detail_href {
                Some(href) => match self.fetcher.fetch(href).await {
                    Ok(detail) => PhoneExtractor::extract(self.fetcher.renderer(), &detail).await,
                    Err(e) => {
                        let e = absorb(e)?;
                        tracing::info!("Network failure while crawling entry: {}", e);
                        self.stats.phone_lookups_failed += 1;
                        Vec::new()
                    }
                },
                None => {
                    tracing::debug!("Entry {} has no detail page", index + 1);
                    Vec::new()
                }
            };

            records.push(ListingRecord::new(
                candidate.business_name,
                candidate.location,
                &phones,
            ));
        }

        Ok(records)
    }

    fn finish_keyword(&mut self, letter: char, ordinal: usize) -> Result<CrawlState, CrawlerError> {
        self.checkpoint = Checkpoint::new(letter, ordinal, 1).with_next_keyword();
        self.save()?;
        Ok(CrawlState::AtKeyword(letter, ordinal + 1))
    }

    fn finish_alphabet(&mut self, letter: char) -> Result<CrawlState, CrawlerError> {
        self.checkpoint = self.checkpoint.with_next_alphabet();
        self.save()?;

        if Some(letter) == self.traversal.last_visited_letter() {
            return Ok(CrawlState::Done);
        }
        Ok(next_letter(letter).map_or(CrawlState::Done, CrawlState::AtAlphabet))
    }

    fn category(&self, ordinal: usize) -> Option<&KeywordCategory> {
        ordinal.checked_sub(1).and_then(|i| self.categories.get(i))
    }

    fn save(&mut self) -> Result<(), CrawlerError> {
        self.store.save(&self.checkpoint)?;
        Ok(())
    }
}

/// Hands back a failure the crawl can skip past, propagates any other
fn absorb(err: impl Into<CrawlerError>) -> Result<CrawlerError, CrawlerError> {
    let err = err.into();
    if err.is_recoverable() {
        Ok(err)
    } else {
        Err(err)
    }
}
