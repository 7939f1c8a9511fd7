//! Id allocation, creation and in-place updates of work items

use crate::error::TrackerError;
use crate::models::{
    today, ItemFilter, NewFeature, NewStory, WorkItem, WorkItemStatus, WorkItemStore,
    WorkItemType, WorkItemUpdate,
};

/// Width of a rendered work item id
pub const ID_WIDTH: usize = 5;

impl WorkItemStore {
    /// Returns the next id: one past the highest numeric id in the store.
    ///
    /// Gaps are never reused. Ids that are not numeric are ignored, and an
    /// empty store starts at "00001". Past 99999 the result grows to six
    /// digits and will fail validation. Never panics on oversized ids.
    pub fn next_id(&self) -> String {
        let max = self
            .work_items
            .iter()
            .filter_map(|item| item.id.parse::<u128>().ok())
            .max()
            .unwrap_or(0);
        format!("{:0width$}", max.saturating_add(1), width = ID_WIDTH)
    }

    /// Finds the first work item with the given id
    pub fn find_item(&self, id: &str) -> Option<&WorkItem> {
        self.work_items.iter().find(|item| item.id == id)
    }

    pub fn find_item_mut(&mut self, id: &str) -> Option<&mut WorkItem> {
        self.work_items.iter_mut().find(|item| item.id == id)
    }

    /// Items matching every filter that is set, in store order
    pub fn items_matching(&self, filter: &ItemFilter) -> Vec<&WorkItem> {
        self.work_items
            .iter()
            .filter(|item| filter.matches(item))
            .collect()
    }

    /// Creates a feature with the next id and appends it to the store
    pub fn add_feature(&mut self, input: NewFeature) -> &WorkItem {
        let feature = WorkItem {
            id: self.next_id(),
            item_type: Some(WorkItemType::Feature),
            title: input.title,
            status: Some(WorkItemStatus::Todo),
            created_by: input.created_by,
            created_date: today(),
            priority: input.priority,
            tags: input.tags,
            description_file: input.description_file,
            ..Default::default()
        };
        log::debug!("Adding feature {}: {}", feature.id, feature.title);

        self.push(feature)
    }

    /// Creates a story under an existing feature and appends it to the store.
    ///
    /// Fails without touching the store if `parent_feature` is unknown or
    /// names something other than a feature.
    pub fn add_story(&mut self, input: NewStory) -> Result<&WorkItem, TrackerError> {
        match self.find_item(&input.parent_feature) {
            None => return Err(TrackerError::ParentNotFound(input.parent_feature)),
            Some(parent) if !parent.is_feature() => {
                return Err(TrackerError::ParentNotFeature(input.parent_feature))
            }
            Some(_) => {}
        }

        let story = WorkItem {
            id: self.next_id(),
            item_type: Some(WorkItemType::Story),
            title: input.title,
            parent_feature: Some(input.parent_feature),
            status: Some(WorkItemStatus::Todo),
            created_by: input.created_by,
            created_date: today(),
            estimate: input.estimate,
            acceptance_criteria: input.acceptance_criteria,
            description_file: input.description_file,
            priority: input.priority,
            tags: input.tags,
            ..Default::default()
        };
        log::debug!(
            "Adding story {} under feature {}: {}",
            story.id,
            story.parent_feature.as_deref().unwrap_or_default(),
            story.title
        );

        Ok(self.push(story))
    }

    /// Applies `update` to the stored item and stamps `updated_date`.
    ///
    /// The date is refreshed even when the update changes nothing.
    pub fn update_item(
        &mut self,
        id: &str,
        update: WorkItemUpdate,
    ) -> Result<&WorkItem, TrackerError> {
        let item = self
            .find_item_mut(id)
            .ok_or_else(|| TrackerError::ItemNotFound(id.to_string()))?;

        log::debug!("Updating work item {}: {:?}", id, update);
        update.apply_to(item);
        item.updated_date = Some(today());

        Ok(item)
    }

    fn push(&mut self, item: WorkItem) -> &WorkItem {
        self.work_items.push(item);
        &self.work_items[self.work_items.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Estimate, Priority};

    fn item(id: &str, item_type: WorkItemType) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            item_type: Some(item_type),
            title: format!("Item {}", id),
            created_by: "pm".to_string(),
            created_date: "2024-01-15".to_string(),
            status: Some(WorkItemStatus::Todo),
            ..Default::default()
        }
    }

    fn store_with(ids: &[&str]) -> WorkItemStore {
        WorkItemStore {
            work_items: ids.iter().map(|id| item(id, WorkItemType::Feature)).collect(),
        }
    }

    fn feature(title: &str) -> NewFeature {
        NewFeature {
            title: title.to_string(),
            created_by: "pm".to_string(),
            ..Default::default()
        }
    }

    fn story(title: &str, parent: &str) -> NewStory {
        NewStory {
            title: title.to_string(),
            parent_feature: parent.to_string(),
            created_by: "pm".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_id_empty_store() {
        assert_eq!(WorkItemStore::new().next_id(), "00001");
    }

    #[test]
    fn test_next_id_sequential() {
        assert_eq!(store_with(&["00001", "00002"]).next_id(), "00003");
    }

    #[test]
    fn test_next_id_does_not_fill_gaps() {
        assert_eq!(store_with(&["00001", "00005"]).next_id(), "00006");
        assert_eq!(store_with(&["00001", "00099"]).next_id(), "00100");
    }

    #[test]
    fn test_next_id_uses_max_not_order() {
        assert_eq!(store_with(&["00042", "00007"]).next_id(), "00043");
    }

    #[test]
    fn test_next_id_skips_non_numeric_ids() {
        assert_eq!(store_with(&["abc", "00003"]).next_id(), "00004");
        assert_eq!(store_with(&["abc"]).next_id(), "00001");
    }

    #[test]
    fn test_next_id_overflows_past_five_digits() {
        assert_eq!(store_with(&["99999"]).next_id(), "100000");
    }

    #[test]
    fn test_next_id_handles_ids_beyond_u64() {
        assert_eq!(
            store_with(&["00001", "18446744073709551615"]).next_id(),
            "18446744073709551616"
        );
        let huge = u128::MAX.to_string();
        assert_eq!(store_with(&[huge.as_str()]).next_id(), huge);
    }

    #[test]
    fn test_add_feature_defaults() {
        let mut store = WorkItemStore::new();
        let created = store.add_feature(feature("Authentication")).clone();

        assert_eq!(created.id, "00001");
        assert_eq!(created.item_type, Some(WorkItemType::Feature));
        assert_eq!(created.status, Some(WorkItemStatus::Todo));
        assert_eq!(created.created_by, "pm");
        assert_eq!(created.created_date, today());
        assert!(created.priority.is_none());
        assert!(created.tags.is_none());
        assert!(created.updated_date.is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.work_items[0], created);
    }

    #[test]
    fn test_add_feature_with_optional_fields() {
        let mut store = WorkItemStore::new();
        let created = store.add_feature(NewFeature {
            priority: Some(Priority::High),
            tags: Some(vec!["auth".to_string(), "security".to_string()]),
            description_file: Some("docs/auth.md".to_string()),
            ..feature("Authentication")
        });

        assert_eq!(created.priority, Some(Priority::High));
        assert_eq!(created.tags.as_ref().unwrap().len(), 2);
        assert_eq!(created.description_file.as_deref(), Some("docs/auth.md"));
    }

    #[test]
    fn test_add_feature_allows_duplicate_titles() {
        let mut store = WorkItemStore::new();
        store.add_feature(feature("Same"));
        store.add_feature(feature("Same"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.work_items[1].id, "00002");
    }

    #[test]
    fn test_add_story_under_feature() {
        let mut store = WorkItemStore::new();
        let feature_id = store.add_feature(feature("Authentication")).id.clone();
        let created = store
            .add_story(NewStory {
                estimate: Some(Estimate::M),
                acceptance_criteria: Some(vec!["User can log in".to_string()]),
                ..story("Login form", &feature_id)
            })
            .unwrap()
            .clone();

        assert_eq!(created.id, "00002");
        assert_eq!(created.item_type, Some(WorkItemType::Story));
        assert_eq!(created.parent_feature.as_deref(), Some(feature_id.as_str()));
        assert_eq!(created.status, Some(WorkItemStatus::Todo));
        assert_eq!(created.estimate, Some(Estimate::M));
        assert_eq!(created.acceptance_criteria.unwrap().len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut store = WorkItemStore::new();
        let f = store.add_feature(feature("F")).id.clone();
        let s1 = store.add_story(story("S1", &f)).unwrap().id.clone();
        let s2 = store.add_story(story("S2", &f)).unwrap().id.clone();
        assert!(f < s1 && s1 < s2);
    }

    #[test]
    fn test_add_story_unknown_parent_leaves_store_unchanged() {
        let mut store = store_with(&["00001"]);
        let before = store.clone();

        let err = store.add_story(story("Orphan", "99999")).unwrap_err();

        assert_eq!(err, TrackerError::ParentNotFound("99999".to_string()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_story_parent_must_be_feature() {
        let mut store = WorkItemStore::new();
        let f = store.add_feature(feature("F")).id.clone();
        let s = store.add_story(story("S", &f)).unwrap().id.clone();

        let err = store.add_story(story("Nested", &s)).unwrap_err();

        assert_eq!(err, TrackerError::ParentNotFeature(s));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_item() {
        let store = store_with(&["00001", "00002"]);
        assert_eq!(store.find_item("00002").unwrap().title, "Item 00002");
        assert!(store.find_item("00003").is_none());
    }

    #[test]
    fn test_find_item_returns_first_duplicate() {
        let mut store = store_with(&["00001", "00001"]);
        store.work_items[1].title = "Second".to_string();
        assert_eq!(store.find_item("00001").unwrap().title, "Item 00001");
    }

    #[test]
    fn test_update_item_applies_partial_fields() {
        let mut store = store_with(&["00001"]);
        let updated = store
            .update_item(
                "00001",
                WorkItemUpdate {
                    status: Some(WorkItemStatus::InProgress),
                    assigned_to: Some("developer".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .clone();

        assert_eq!(updated.status, Some(WorkItemStatus::InProgress));
        assert_eq!(updated.assigned_to.as_deref(), Some("developer"));
        assert_eq!(updated.title, "Item 00001");
        assert_eq!(updated.created_date, "2024-01-15");
        assert_eq!(updated.updated_date, Some(today()));
        // mutated in place
        assert_eq!(store.work_items[0], updated);
    }

    #[test]
    fn test_update_item_touches_date_on_noop() {
        let mut store = store_with(&["00001"]);
        let updated = store
            .update_item("00001", WorkItemUpdate::status(WorkItemStatus::Todo))
            .unwrap();
        assert_eq!(updated.updated_date, Some(today()));
    }

    #[test]
    fn test_update_item_missing_id() {
        let mut store = store_with(&["00001"]);
        let before = store.clone();

        let err = store
            .update_item("00009", WorkItemUpdate::assign("qa"))
            .unwrap_err();

        assert_eq!(err, TrackerError::ItemNotFound("00009".to_string()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_items_matching() {
        let mut store = WorkItemStore::new();
        let f = store.add_feature(feature("F")).id.clone();
        let s1 = store.add_story(story("S1", &f)).unwrap().id.clone();
        store.add_story(story("S2", &f)).unwrap();
        store
            .update_item(&s1, WorkItemUpdate::assign("developer"))
            .unwrap();

        let stories = store.items_matching(&ItemFilter {
            item_type: Some(WorkItemType::Story),
            ..Default::default()
        });
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "S1");

        let assigned = store.items_matching(&ItemFilter {
            assigned_to: Some("developer".to_string()),
            ..Default::default()
        });
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, s1);
    }
}
