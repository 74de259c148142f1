use crate::migration::filter::filter_entities;
use crate::{ImportOutcome, Migration, MigrationResult, PhaseReport};

use tr_core::{AddSectionRequest, EntityKind, Section};

use std::collections::{HashMap, HashSet, VecDeque};

impl Migration {
    pub async fn fetch_sections_data(&self) -> MigrationResult<(Vec<Section>, Vec<Section>)> {
        self.fetch_both(
            EntityKind::Sections,
            self.client.get_sections(self.src_project, self.src_suite),
            self.client.get_sections(self.dst_project, self.dst_suite),
        )
        .await
    }

    pub fn filter_sections(&self, source: &[Section], target: &[Section]) -> Vec<Section> {
        filter_entities(source, target, &self.compare_field)
    }

    /// Parents are created before their children, one depth level at a time,
    /// so every child can point at its parent's new ID.
    pub async fn import_sections(
        &self,
        filtered: &[Section],
        dry_run: bool,
    ) -> MigrationResult<ImportOutcome> {
        if dry_run {
            return self.import_items(filtered, true, |_| async { Ok(0) }).await;
        }

        let mut outcome = ImportOutcome::default();
        for wave in section_waves(filtered) {
            let imported = self
                .import_items(&wave, false, |section: &Section| {
                    let request = AddSectionRequest::from_section(
                        section,
                        self.destination_suite(section),
                        self.destination_parent(section),
                    );
                    async move {
                        let request = &request;
                        self.call_guarded(EntityKind::Sections, "add_section", move || {
                            self.client.add_section(self.dst_project, request)
                        })
                        .await
                        .map(|created| created.id)
                    }
                })
                .await?;
            outcome.merge(imported);
        }
        Ok(outcome)
    }

    pub async fn migrate_sections(&self, dry_run: bool) -> MigrationResult<PhaseReport> {
        let (source, target) = self.fetch_sections_data().await?;
        let filtered = self.filter_sections(&source, &target);
        if !dry_run {
            self.record_existing(&source, &target);
        }
        let outcome = self.import_sections(&filtered, dry_run).await?;
        Ok(self.finish_phase(dry_run, &source, &target, &filtered, outcome))
    }

    fn destination_suite(&self, section: &Section) -> Option<i64> {
        self.dst_suite.or_else(|| {
            section
                .suite_id
                .and_then(|suite_id| self.target_for(EntityKind::Suites, suite_id))
        })
    }

    fn destination_parent(&self, section: &Section) -> Option<i64> {
        let parent_id = section.parent_id?;
        let mapped = self.target_for(EntityKind::Sections, parent_id);
        if mapped.is_none() {
            log::warn!(
                "Parent section {parent_id} of '{}' is not mapped, creating it at the suite root",
                section.name
            );
        }
        mapped
    }
}

/// Group sections into depth levels: roots (no parent, or a parent outside
/// the list) first, then their children, and so on. Sections caught in a
/// parent cycle form a final level.
pub(crate) fn section_waves(sections: &[Section]) -> Vec<Vec<Section>> {
    let ids: HashSet<i64> = sections.iter().map(|section| section.id).collect();

    let mut children_of: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for (i, section) in sections.iter().enumerate() {
        match section.parent_id {
            Some(parent_id) if ids.contains(&parent_id) && parent_id != section.id => {
                children_of.entry(parent_id).or_default().push(i);
            }
            _ => queue.push_back((i, 0)),
        }
    }

    let mut waves: Vec<Vec<Section>> = Vec::new();
    let mut placed = vec![false; sections.len()];
    while let Some((i, level)) = queue.pop_front() {
        if placed[i] {
            continue;
        }
        placed[i] = true;
        if waves.len() <= level {
            waves.resize_with(level + 1, Vec::new);
        }
        waves[level].push(sections[i].clone());

        if let Some(children) = children_of.get(&sections[i].id) {
            queue.extend(children.iter().map(|&child| (child, level + 1)));
        }
    }

    let stranded: Vec<Section> = sections
        .iter()
        .zip(&placed)
        .filter(|(_, placed)| !**placed)
        .map(|(section, _)| section.clone())
        .collect();
    if !stranded.is_empty() {
        log::warn!(
            "{} sections form a parent cycle and are imported last",
            stranded.len()
        );
        waves.push(stranded);
    }

    waves
}
