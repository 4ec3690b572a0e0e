use crate::{
    felt::Felt,
    hash::combine_key,
    meta::Layout,
    obs::{
        event::{EventSink, WorldEvent},
        sink::{self, MetricsEvent},
    },
    permission::PermissionRegistry,
    storage::{FlatStorage, StagedStorage},
    world::{DispatchError, ModelIndex, World},
};

impl<S, P, E> World<S, P, E>
where
    S: FlatStorage,
    P: PermissionRegistry,
    E: EventSink,
{
    /// Read an entity, or one member of it. Never-written entities read as
    /// zeros. Reads are not permission-gated.
    pub fn entity(
        &self,
        model: Felt,
        index: &ModelIndex,
        layout: &Layout,
    ) -> Result<Vec<Felt>, DispatchError> {
        let (key, layout) = resolve(index, layout)?;
        let values = self.entities.read(&self.storage, model, key, layout)?;

        sink::record(MetricsEvent::EntityRead {
            table: model,
            felts: values.len() as u64,
        });

        Ok(values)
    }

    // Ungated write, keeping the index and the event stream in step. Record
    // and index writes are staged together and land only if both succeed.
    pub(crate) fn write_entity(
        &mut self,
        model: Felt,
        index: &ModelIndex,
        values: &[Felt],
        layout: &Layout,
    ) -> Result<(), DispatchError> {
        let (key, target) = resolve(index, layout)?;
        let mut staged = StagedStorage::new(&self.storage);
        self.entities
            .write(&mut staged, model, key, values, target)?;

        let event = match index {
            ModelIndex::Keys(keys) => {
                self.index
                    .create_with_keys(&mut staged, model, key, keys)?;

                WorldEvent::StoreSetRecord {
                    selector: model,
                    entity_id: key,
                    keys: keys.clone(),
                    values: values.to_vec(),
                }
            }
            ModelIndex::Id(id) => {
                self.index.create(&mut staged, model, *id)?;

                WorldEvent::StoreUpdateRecord {
                    selector: model,
                    entity_id: *id,
                    values: values.to_vec(),
                }
            }
            ModelIndex::MemberId(id, member) => {
                self.index.create(&mut staged, model, *id)?;

                WorldEvent::StoreUpdateMember {
                    selector: model,
                    entity_id: *id,
                    member_selector: *member,
                    values: values.to_vec(),
                }
            }
        };
        staged.prepare().apply(&mut self.storage);

        sink::record(MetricsEvent::EntityWrite {
            table: model,
            felts: values.len() as u64,
        });
        self.events.emit(event);

        Ok(())
    }

    // Ungated delete of a whole entity.
    pub(crate) fn erase_entity(
        &mut self,
        model: Felt,
        index: &ModelIndex,
        layout: &Layout,
    ) -> Result<(), DispatchError> {
        if matches!(index, ModelIndex::MemberId(..)) {
            return Err(DispatchError::CannotDeleteMember);
        }

        let (entity_id, layout) = resolve(index, layout)?;
        let mut staged = StagedStorage::new(&self.storage);
        self.entities
            .delete(&mut staged, model, entity_id, layout)?;
        self.index.delete(&mut staged, model, entity_id)?;
        staged.prepare().apply(&mut self.storage);

        sink::record(MetricsEvent::EntityDelete { table: model });
        self.events.emit(WorldEvent::StoreDelRecord {
            selector: model,
            entity_id,
        });

        Ok(())
    }
}

// Storage key and effective layout for an access descriptor. Whole entities
// live under their id; a member lives under the same derived key the struct
// walk would give it.
fn resolve<'l>(index: &ModelIndex, layout: &'l Layout) -> Result<(Felt, &'l Layout), DispatchError> {
    if !matches!(layout, Layout::Fixed(_) | Layout::Struct(_)) {
        return Err(DispatchError::UnexpectedLayout {
            kind: layout.kind_name(),
        });
    }

    match index {
        ModelIndex::Keys(_) | ModelIndex::Id(_) => Ok((index.entity_id(), layout)),
        ModelIndex::MemberId(id, member) => {
            let member_layout = layout
                .find_field(*member)
                .ok_or(DispatchError::BadMemberId { member: *member })?;

            Ok((combine_key(*id, *member), member_layout))
        }
    }
}
