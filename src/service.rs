//! Serves summaries from the cache, computing and caching them on a miss.

use std::{future::Future, sync::Arc, time::Duration};

use tracing::Instrument;

use crate::{
    Error,
    aggregation::{AggregationInput, aggregate},
    cache::{CacheKey, SummaryCache},
    config::SummaryConfig,
    data_source::{DataSource, DataSourceError},
    models::UserID,
    mutation::MutationEvent,
    period::Period,
    report::CurrencyFormat,
    summary::Summary,
};

/// The read entry point for monthly summaries and the sink for invalidations.
///
/// Concurrent misses for the same key may each query the data source; the
/// last one to finish without an intervening eviction is the one cached.
pub struct SummaryService<D> {
    data_source: D,
    cache: SummaryCache,
    currency: CurrencyFormat,
    fetch_timeout: Duration,
}

impl<D: DataSource> SummaryService<D> {
    /// Create a service that reads from `data_source`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrencySymbol] if the configured currency symbol
    /// cannot be used.
    pub fn new(data_source: D, config: SummaryConfig) -> Result<Self, Error> {
        Ok(Self {
            data_source,
            cache: SummaryCache::new(),
            currency: CurrencyFormat::new(&config.currency_symbol)?,
            fetch_timeout: config.fetch_timeout,
        })
    }

    /// The data source summaries are computed from.
    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    /// The cache holding computed summaries.
    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    /// Get the summary of `user_id`'s finances for (`month`, `year`).
    ///
    /// A cached summary is returned as-is. Otherwise the period's transactions,
    /// the previous month's transactions and the user's budgets are fetched,
    /// aggregated and cached.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] before touching the data source if
    /// `month` is not 1-12 or `year` is not positive, and
    /// [Error::DataUnavailable] if a fetch fails or times out. Failed
    /// computations are never cached.
    pub async fn get_summary(
        &self,
        user_id: UserID,
        month: u8,
        year: i32,
    ) -> Result<Arc<Summary>, Error> {
        let period = Period::new(month, year)?;
        let key = CacheKey::new(user_id, period);

        if let Some(summary) = self.cache.get(&key) {
            tracing::debug!("Summary cache hit for user {user_id} in {period}");
            return Ok(summary);
        }

        tracing::debug!("Summary cache miss for user {user_id} in {period}");
        let generation = self.cache.generation(&key);
        let summary = Arc::new(
            self.compute_summary(user_id, period)
                .instrument(tracing::debug_span!("compute_summary", %user_id, %period))
                .await?,
        );

        if !self.cache.put_if_current(key, summary.clone(), generation) {
            tracing::debug!(
                "Summary for user {user_id} in {period} was invalidated while computing, not caching it"
            );
        }

        Ok(summary)
    }

    async fn compute_summary(&self, user_id: UserID, period: Period) -> Result<Summary, Error> {
        let prior_period = period.previous();
        let invalid = |period: Period| Error::InvalidPeriod {
            month: period.month(),
            year: period.year(),
        };
        let date_range = period.date_range().ok_or_else(|| invalid(period))?;
        let prior_date_range = prior_period
            .date_range()
            .ok_or_else(|| invalid(prior_period))?;

        let (transactions, prior_month_transactions, budgets) = tokio::try_join!(
            self.fetch(self.data_source.fetch_transactions(user_id, date_range)),
            self.fetch(
                self.data_source
                    .fetch_transactions(user_id, prior_date_range)
            ),
            self.fetch(self.data_source.fetch_budgets(user_id)),
        )?;

        let summary = aggregate(
            user_id,
            period,
            AggregationInput {
                transactions: &transactions,
                prior_month_transactions: &prior_month_transactions,
                budgets: &budgets,
            },
            &self.currency,
        );

        tracing::info!(
            "Computed summary for user {user_id} in {period} from {} transactions and {} budgets",
            transactions.len(),
            budgets.len()
        );

        Ok(summary)
    }

    async fn fetch<T>(
        &self,
        request: impl Future<Output = Result<T, DataSourceError>>,
    ) -> Result<T, Error> {
        let result = match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(DataSourceError::TimedOut),
        };

        result.map_err(|error| {
            tracing::error!("Could not fetch summary data: {error}");
            error.into()
        })
    }

    /// Drop the cached summary of `user_id` for (`month`, `year`), if any.
    ///
    /// This never fails. Out-of-range periods can never have been cached, so
    /// they are ignored.
    pub fn invalidate_summary(&self, user_id: UserID, month: u8, year: i32) {
        match Period::new(month, year) {
            Ok(period) => self.invalidate_period(user_id, period),
            Err(error) => tracing::debug!("Ignoring invalidation: {error}"),
        }
    }

    fn invalidate_period(&self, user_id: UserID, period: Period) {
        if self.cache.evict(&CacheKey::new(user_id, period)) {
            tracing::debug!("Evicted summary for user {user_id} in {period}");
        }
    }

    /// Invalidate every summary that `event` may have made stale.
    pub fn handle_mutation(&self, event: &MutationEvent) {
        match event.affected_periods() {
            Ok(periods) => {
                for period in periods {
                    self.invalidate_period(event.user_id(), period);
                }
            }
            Err(error) => tracing::debug!("Ignoring {:?} event: {error}", event.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ops::RangeInclusive,
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use time::{Date, macros::date};
    use tokio::sync::Notify;

    use super::SummaryService;
    use crate::{
        Error,
        config::SummaryConfig,
        data_source::{DataSource, DataSourceError, MemoryDataSource},
        models::{Budget, Category, Transaction, TransactionType, UserID},
        mutation::{MutationEvent, MutationKind},
    };

    /// Wraps a [MemoryDataSource] and counts how often it is queried.
    #[derive(Default)]
    struct CountingDataSource {
        inner: MemoryDataSource,
        fetches: AtomicUsize,
    }

    impl CountingDataSource {
        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl DataSource for CountingDataSource {
        async fn fetch_transactions(
            &self,
            user_id: UserID,
            date_range: RangeInclusive<Date>,
        ) -> Result<Vec<Transaction>, DataSourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_transactions(user_id, date_range).await
        }

        async fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, DataSourceError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_budgets(user_id).await
        }
    }

    /// Holds the first budget fetch until `release` is notified.
    struct GatedDataSource {
        inner: CountingDataSource,
        holding: AtomicBool,
        fetching: Notify,
        release: Notify,
    }

    impl GatedDataSource {
        fn new() -> Self {
            Self {
                inner: CountingDataSource::default(),
                holding: AtomicBool::new(true),
                fetching: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    impl DataSource for GatedDataSource {
        async fn fetch_transactions(
            &self,
            user_id: UserID,
            date_range: RangeInclusive<Date>,
        ) -> Result<Vec<Transaction>, DataSourceError> {
            self.inner.fetch_transactions(user_id, date_range).await
        }

        async fn fetch_budgets(&self, user_id: UserID) -> Result<Vec<Budget>, DataSourceError> {
            if self.holding.swap(false, Ordering::SeqCst) {
                self.fetching.notify_one();
                self.release.notified().await;
            }

            self.inner.fetch_budgets(user_id).await
        }
    }

    struct SlowDataSource;

    impl DataSource for SlowDataSource {
        async fn fetch_transactions(
            &self,
            _: UserID,
            _: RangeInclusive<Date>,
        ) -> Result<Vec<Transaction>, DataSourceError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn fetch_budgets(&self, _: UserID) -> Result<Vec<Budget>, DataSourceError> {
            Ok(Vec::new())
        }
    }

    fn user() -> UserID {
        UserID::new(1)
    }

    fn food(amount: f64, date: Date) -> Transaction {
        Transaction::build(0, user(), amount, date)
            .category(Category::new("Food", TransactionType::Expense))
    }

    fn get_service() -> SummaryService<CountingDataSource> {
        SummaryService::new(CountingDataSource::default(), SummaryConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let service = get_service();
        service
            .data_source()
            .inner
            .insert_transaction(food(40.0, date!(2025 - 03 - 03)));

        let first = service.get_summary(user(), 3, 2025).await.unwrap();
        let fetches = service.data_source().fetches();
        let second = service.get_summary(user(), 3, 2025).await.unwrap();

        assert_eq!(fetches, 3);
        assert_eq!(service.data_source().fetches(), fetches);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.total_expense, 40.0);
    }

    #[tokio::test]
    async fn invalidation_forces_recomputation() {
        let service = get_service();
        let source = &service.data_source().inner;
        source.insert_transaction(food(40.0, date!(2025 - 03 - 03)));
        service.get_summary(user(), 3, 2025).await.unwrap();

        source.insert_transaction(food(60.0, date!(2025 - 03 - 04)));
        let stale = service.get_summary(user(), 3, 2025).await.unwrap();
        service.invalidate_summary(user(), 3, 2025);
        let fresh = service.get_summary(user(), 3, 2025).await.unwrap();

        assert_eq!(stale.total_expense, 40.0);
        assert_eq!(fresh.total_expense, 100.0);
    }

    #[tokio::test]
    async fn invalidation_during_computation_is_not_undone() {
        let service =
            SummaryService::new(GatedDataSource::new(), SummaryConfig::default()).unwrap();
        let source = service.data_source();
        source
            .inner
            .inner
            .insert_transaction(food(40.0, date!(2025 - 03 - 03)));

        let (in_flight, ()) = tokio::join!(service.get_summary(user(), 3, 2025), async {
            source.fetching.notified().await;
            source
                .inner
                .inner
                .insert_transaction(food(60.0, date!(2025 - 03 - 04)));
            service.invalidate_summary(user(), 3, 2025);
            source.release.notify_one();
        });

        assert_eq!(in_flight.unwrap().total_expense, 40.0);
        assert!(service.cache().is_empty());

        let fetches = source.inner.fetches();
        let fresh = service.get_summary(user(), 3, 2025).await.unwrap();

        assert_eq!(fresh.total_expense, 100.0);
        assert_eq!(source.inner.fetches(), fetches + 3);
        assert_eq!(service.cache().len(), 1);
    }

    #[tokio::test]
    async fn transaction_mutation_invalidates_next_month_trend() {
        let service = get_service();
        let source = &service.data_source().inner;
        let april = service.get_summary(user(), 4, 2025).await.unwrap();
        assert_eq!(april.last_month_expense, 0.0);

        let transaction = food(75.0, date!(2025 - 03 - 31));
        source.insert_transaction(transaction.clone());
        service.handle_mutation(&MutationEvent::Transaction {
            user_id: user(),
            date: transaction.date,
            kind: MutationKind::Created,
        });

        let april = service.get_summary(user(), 4, 2025).await.unwrap();
        assert_eq!(april.last_month_expense, 75.0);
    }

    #[tokio::test]
    async fn budget_mutation_invalidates_its_month() {
        let service = get_service();
        let source = &service.data_source().inner;
        let before = service.get_summary(user(), 3, 2025).await.unwrap();

        source.insert_budget(Budget::new(
            user(),
            Some(Category::new("Food", TransactionType::Expense)),
            3,
            2025,
            500.0,
        ));
        service.handle_mutation(&MutationEvent::Budget {
            user_id: user(),
            month: 3,
            year: 2025,
            kind: MutationKind::Created,
        });
        let after = service.get_summary(user(), 3, 2025).await.unwrap();

        assert_eq!(before.budget, "Not Available");
        assert_eq!(after.budget, "Food: ₹500.00 (3 2025)");
    }

    #[tokio::test]
    async fn invalid_period_is_rejected_before_fetching() {
        let service = get_service();

        let bad_month = service.get_summary(user(), 13, 2025).await;
        let bad_year = service.get_summary(user(), 1, 0).await;

        assert_eq!(
            bad_month,
            Err(Error::InvalidPeriod {
                month: 13,
                year: 2025
            })
        );
        assert!(matches!(bad_year, Err(Error::InvalidPeriod { .. })));
        assert_eq!(service.data_source().fetches(), 0);
    }

    #[tokio::test]
    async fn unreachable_data_source_is_data_unavailable_and_not_cached() {
        let service = get_service();
        service.data_source().inner.set_unreachable(true);

        let result = service.get_summary(user(), 3, 2025).await;

        assert!(matches!(result, Err(Error::DataUnavailable(_))));
        assert!(service.cache().is_empty());

        service.data_source().inner.set_unreachable(false);
        assert!(service.get_summary(user(), 3, 2025).await.is_ok());
    }

    #[tokio::test]
    async fn slow_data_source_times_out() {
        let config = SummaryConfig {
            fetch_timeout: Duration::from_millis(20),
            ..SummaryConfig::default()
        };
        let service = SummaryService::new(SlowDataSource, config).unwrap();

        let result = service.get_summary(user(), 3, 2025).await;

        assert!(matches!(result, Err(Error::DataUnavailable(_))));
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn invalidating_absent_or_invalid_period_is_harmless() {
        let service = get_service();

        service.invalidate_summary(user(), 3, 2025);
        service.invalidate_summary(user(), 0, 2025);

        assert!(service.cache().is_empty());
    }
}
