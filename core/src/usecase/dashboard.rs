//! Dashboard aggregation over three independent read queries.
//!
//! The summary combines the latest bookings, the all-time booking count,
//! and revenue statistics. [`DashboardUsecase::dashboard_serial`] runs the
//! reads strictly in order; [`DashboardUsecase::dashboard_concurrent`] is a
//! drop-in substitute that fans the reads out to one worker each and
//! collects them as they land. Both variants share one deadline, fail on
//! the first sub-query error, and return identical summaries for the same
//! data snapshot and limit.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::entities::{Booking, PriceStats};
use crate::error::{CoreError, Result, SubQuery};
use crate::repository::DashboardRepository;

/// Default shared deadline for one dashboard call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(2);

/// Combined dashboard view assembled from the three sub-queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// All-time booking count.
    pub total_bookings: i64,
    /// Min/max/avg over every booking total.
    pub stats: PriceStats,
    /// The most recent bookings, newest first, at most `limit` rows.
    pub bookings: Vec<Booking>,
}

/// Runs the three dashboard reads sequentially or concurrently under a
/// shared deadline.
#[derive(Debug, Clone)]
pub struct DashboardUsecase<R> {
    repo: R,
    deadline: Duration,
}

impl<R> DashboardUsecase<R>
where
    R: DashboardRepository + Clone + Send + Sync + 'static,
{
    /// Creates a usecase with the default 2-second deadline.
    pub const fn new(repo: R) -> Self {
        Self {
            repo,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Overrides the shared deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Runs the three reads strictly in order under one deadline.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidLimit`] when `limit <= 0` (no read is issued)
    /// - [`CoreError::SubQuery`] wrapping the first read that fails; later
    ///   reads are never issued
    /// - [`CoreError::DeadlineExceeded`] when the deadline elapses first
    pub async fn dashboard_serial(&self, limit: i64) -> Result<DashboardSummary> {
        if limit <= 0 {
            return Err(CoreError::InvalidLimit { limit });
        }
        match tokio::time::timeout(self.deadline, self.run_serial(limit)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::DeadlineExceeded),
        }
    }

    async fn run_serial(&self, limit: i64) -> Result<DashboardSummary> {
        let bookings = self
            .repo
            .latest_bookings(limit)
            .await
            .map_err(|err| CoreError::sub_query(SubQuery::LatestBookings, err))?;
        let total_bookings = self
            .repo
            .booking_count()
            .await
            .map_err(|err| CoreError::sub_query(SubQuery::BookingCount, err))?;
        let stats = self
            .repo
            .revenue_stats()
            .await
            .map_err(|err| CoreError::sub_query(SubQuery::RevenueStats, err))?;
        Ok(DashboardSummary {
            total_bookings,
            stats,
            bookings,
        })
    }

    /// Runs the three reads concurrently under one deadline. Same contract
    /// and result as [`Self::dashboard_serial`].
    ///
    /// Exactly one worker is spawned per read; each sends its result once
    /// over a dedicated oneshot channel. The collection loop selects over
    /// the three receivers plus the deadline, attributing results by
    /// channel rather than by arrival order. On the first error or on
    /// deadline expiry the outstanding workers are aborted; a worker that
    /// completes after its receiver is gone sends into a closed channel
    /// and the result is dropped.
    ///
    /// # Errors
    ///
    /// Same cases as [`Self::dashboard_serial`].
    pub async fn dashboard_concurrent(&self, limit: i64) -> Result<DashboardSummary> {
        if limit <= 0 {
            return Err(CoreError::InvalidLimit { limit });
        }

        let (bookings_tx, mut bookings_rx) = oneshot::channel();
        let (count_tx, mut count_rx) = oneshot::channel();
        let (stats_tx, mut stats_rx) = oneshot::channel();

        let repo = self.repo.clone();
        let bookings_task = tokio::spawn(async move {
            let _ = bookings_tx.send(repo.latest_bookings(limit).await);
        });
        let repo = self.repo.clone();
        let count_task = tokio::spawn(async move {
            let _ = count_tx.send(repo.booking_count().await);
        });
        let repo = self.repo.clone();
        let stats_task = tokio::spawn(async move {
            let _ = stats_tx.send(repo.revenue_stats().await);
        });
        let tasks = [&bookings_task, &count_task, &stats_task];

        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);

        let mut bookings: Option<Vec<Booking>> = None;
        let mut total_bookings: Option<i64> = None;
        let mut stats: Option<PriceStats> = None;

        while bookings.is_none() || total_bookings.is_none() || stats.is_none() {
            tokio::select! {
                () = &mut deadline => {
                    abort_all(&tasks);
                    return Err(CoreError::DeadlineExceeded);
                }
                received = &mut bookings_rx, if bookings.is_none() => {
                    match settle(received, SubQuery::LatestBookings) {
                        Ok(value) => bookings = Some(value),
                        Err(err) => {
                            abort_all(&tasks);
                            return Err(err);
                        }
                    }
                }
                received = &mut count_rx, if total_bookings.is_none() => {
                    match settle(received, SubQuery::BookingCount) {
                        Ok(value) => total_bookings = Some(value),
                        Err(err) => {
                            abort_all(&tasks);
                            return Err(err);
                        }
                    }
                }
                received = &mut stats_rx, if stats.is_none() => {
                    match settle(received, SubQuery::RevenueStats) {
                        Ok(value) => stats = Some(value),
                        Err(err) => {
                            abort_all(&tasks);
                            return Err(err);
                        }
                    }
                }
            }
        }

        match (bookings, total_bookings, stats) {
            (Some(bookings), Some(total_bookings), Some(stats)) => Ok(DashboardSummary {
                total_bookings,
                stats,
                bookings,
            }),
            // The loop only exits once all three have arrived.
            _ => Err(CoreError::Internal),
        }
    }
}

fn abort_all(tasks: &[&JoinHandle<()>; 3]) {
    for task in tasks {
        task.abort();
    }
}

/// Unwraps one fan-in result, attributing failures to `query`. A closed
/// channel means the worker died without sending (panicked or aborted).
fn settle<T>(
    received: std::result::Result<Result<T>, oneshot::error::RecvError>,
    query: SubQuery,
) -> Result<T> {
    match received {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(CoreError::sub_query(query, err)),
        Err(_) => Err(CoreError::sub_query(query, CoreError::Internal)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use tokio::time::Instant;

    use super::*;
    use crate::entities::BookingStatus;
    use crate::mocks::MockRepositories;

    #[allow(clippy::cast_precision_loss)]
    fn seeded_bookings(n: i64) -> Vec<Booking> {
        (1..=n)
            .map(|i| Booking {
                id: i,
                user_id: 1,
                showtime_id: 1,
                status: BookingStatus::Paid,
                // Totals 10.0, 20.0, ... so stats are easy to predict.
                total_amount: (i * 10) as f64,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn repo_with(n: i64) -> MockRepositories {
        MockRepositories::new().with_bookings(seeded_bookings(n))
    }

    #[tokio::test]
    async fn serial_returns_limit_rows_and_stats_over_everything() {
        let usecase = DashboardUsecase::new(repo_with(25));

        let summary = usecase.dashboard_serial(10).await.unwrap();

        assert_eq!(summary.bookings.len(), 10);
        assert_eq!(summary.bookings[0].id, 25); // newest first
        assert_eq!(summary.bookings[9].id, 16);
        assert_eq!(summary.total_bookings, 25);
        assert!((summary.stats.min - 10.0).abs() < f64::EPSILON);
        assert!((summary.stats.max - 250.0).abs() < f64::EPSILON);
        assert!((summary.stats.avg - 130.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn concurrent_matches_serial_on_the_same_snapshot() {
        let repo = repo_with(25);
        let usecase = DashboardUsecase::new(repo);

        let serial = usecase.dashboard_serial(10).await.unwrap();
        let concurrent = usecase.dashboard_concurrent(10).await.unwrap();

        assert_eq!(serial, concurrent);
    }

    #[tokio::test]
    async fn concurrent_collects_out_of_order_arrivals() {
        // Stagger the reads so the count lands before the bookings.
        let repo = repo_with(25)
            .with_read_latency(SubQuery::LatestBookings, Duration::from_millis(30))
            .with_read_latency(SubQuery::BookingCount, Duration::from_millis(1))
            .with_read_latency(SubQuery::RevenueStats, Duration::from_millis(15));
        let usecase = DashboardUsecase::new(repo);

        let summary = usecase.dashboard_concurrent(10).await.unwrap();

        assert_eq!(summary.bookings.len(), 10);
        assert_eq!(summary.total_bookings, 25);
    }

    #[tokio::test]
    async fn invalid_limit_is_rejected_without_touching_the_store() {
        for limit in [0, -5] {
            let repo = repo_with(3);
            let usecase = DashboardUsecase::new(repo.clone());

            let serial = usecase.dashboard_serial(limit).await;
            let concurrent = usecase.dashboard_concurrent(limit).await;

            assert_eq!(serial, Err(CoreError::InvalidLimit { limit }));
            assert_eq!(concurrent, Err(CoreError::InvalidLimit { limit }));
            assert_eq!(repo.dashboard_read_calls(), (0, 0, 0));
        }
    }

    #[tokio::test]
    async fn empty_store_yields_zeroed_summary() {
        let usecase = DashboardUsecase::new(MockRepositories::new());

        for summary in [
            usecase.dashboard_serial(10).await.unwrap(),
            usecase.dashboard_concurrent(10).await.unwrap(),
        ] {
            assert!(summary.bookings.is_empty());
            assert_eq!(summary.total_bookings, 0);
            assert_eq!(summary.stats, PriceStats::default());
        }
    }

    #[tokio::test]
    async fn first_failure_names_the_failing_sub_query() {
        let repo = repo_with(5).with_failing_read(SubQuery::BookingCount);
        let usecase = DashboardUsecase::new(repo.clone());

        let serial = usecase.dashboard_serial(10).await;
        // Serial stops at the failed count; the stats read is never issued.
        assert_eq!(repo.dashboard_read_calls(), (1, 1, 0));

        let concurrent = usecase.dashboard_concurrent(10).await;

        for result in [serial, concurrent] {
            match result {
                Err(CoreError::SubQuery { query, source }) => {
                    assert_eq!(query, SubQuery::BookingCount);
                    assert!(matches!(*source, CoreError::Database(_)));
                }
                other => panic!("expected wrapped sub-query error, got {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_fails_fast_without_waiting_for_slow_workers() {
        // The failing count read answers instantly; the other two would
        // take far longer than the deadline if anyone waited for them.
        let repo = repo_with(5)
            .with_failing_read(SubQuery::BookingCount)
            .with_read_latency(SubQuery::LatestBookings, Duration::from_secs(30))
            .with_read_latency(SubQuery::RevenueStats, Duration::from_secs(30));
        let usecase = DashboardUsecase::new(repo);

        let started = Instant::now();
        let result = usecase.dashboard_concurrent(10).await;

        assert!(matches!(
            result,
            Err(CoreError::SubQuery {
                query: SubQuery::BookingCount,
                ..
            })
        ));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cuts_off_slow_reads_in_both_variants() {
        let slow = || {
            repo_with(5)
                .with_read_latency(SubQuery::LatestBookings, Duration::from_secs(10))
                .with_read_latency(SubQuery::BookingCount, Duration::from_secs(10))
                .with_read_latency(SubQuery::RevenueStats, Duration::from_secs(10))
        };

        let usecase = DashboardUsecase::new(slow());
        let started = Instant::now();
        assert_eq!(
            usecase.dashboard_serial(10).await,
            Err(CoreError::DeadlineExceeded)
        );
        assert_eq!(started.elapsed(), DEFAULT_DEADLINE);

        let usecase = DashboardUsecase::new(slow());
        let started = Instant::now();
        assert_eq!(
            usecase.dashboard_concurrent(10).await,
            Err(CoreError::DeadlineExceeded)
        );
        assert_eq!(started.elapsed(), DEFAULT_DEADLINE);
    }

    #[tokio::test(start_paused = true)]
    async fn one_slow_read_stalls_the_whole_call_past_the_deadline() {
        let repo = repo_with(5).with_read_latency(SubQuery::RevenueStats, Duration::from_secs(5));
        let usecase = DashboardUsecase::new(repo).with_deadline(Duration::from_secs(2));

        assert_eq!(
            usecase.dashboard_concurrent(10).await,
            Err(CoreError::DeadlineExceeded)
        );
    }

    #[tokio::test]
    async fn custom_deadline_is_honored() {
        let repo = repo_with(5);
        let usecase = DashboardUsecase::new(repo).with_deadline(Duration::from_millis(50));

        // Fast reads still complete well inside a tight deadline.
        assert!(usecase.dashboard_concurrent(3).await.is_ok());
    }
}
