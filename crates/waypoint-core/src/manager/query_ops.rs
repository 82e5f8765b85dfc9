//! Search operations for the TaskManager.

use std::sync::Arc;

use super::TaskManager;
use crate::{
    error::Result,
    models::Task,
    params::{Id, QueryTasks},
    search::{self, SearchPage},
};

impl TaskManager {
    /// Searches active tasks and archive snapshots by keywords or exact id.
    pub async fn query_tasks(&self, params: &QueryTasks) -> Result<SearchPage> {
        params.validate()?;
        let params = params.clone();
        let backend = Arc::clone(&self.search);

        self.with_store(move |store| search::search_tasks(&store, backend.as_ref(), &params))
            .await
    }

    /// Full record of a task from the active store or, failing that, from the
    /// archive snapshots.
    pub async fn get_task_detail(&self, params: &Id) -> Result<Option<Task>> {
        if let Some(task) = self.get_task_by_id(params).await? {
            return Ok(Some(task));
        }

        let query = QueryTasks {
            query: params.id.clone(),
            is_id: true,
            page: 1,
            page_size: 1,
        };
        let page = self.query_tasks(&query).await?;
        Ok(page.tasks.into_iter().next())
    }
}
