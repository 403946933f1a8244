// ============================================
// Scene Objects - Объекты сцены и их ID для пикинга
// ============================================
// ID выдаются каждый кадр заново: 1.. в порядке сцены,
// 0 зарезервирован под «ничего».

use std::num::NonZeroU32;

use ultraviolet::{Mat4, Vec3};

use crate::gpu::core::config::ObjectPlacement;
use crate::gpu::terrain::HeightSampler;

/// ID объекта в буфере пикинга (0 не бывает)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickId(NonZeroU32);

impl PickId {
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(PickId)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub position: Vec3,
    pub scale: f32,
    pub pickable: bool,
    pub casts_shadow: bool,
}

impl SceneObject {
    pub fn cube(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale,
            pickable: true,
            casts_shadow: true,
        }
    }

    /// Куб стоит на земле нижней гранью
    pub fn placed(terrain: &(impl HeightSampler + ?Sized), placement: &ObjectPlacement) -> Self {
        let mut object = Self::cube(Vec3::new(placement.x, 0.0, placement.z), placement.scale);
        object.set_ground(terrain, placement.x, placement.z);
        object
    }

    pub fn set_ground(&mut self, terrain: &(impl HeightSampler + ?Sized), x: f32, z: f32) {
        let ground = terrain.height_at(x, z);
        self.position = Vec3::new(x, ground + 0.5 * self.scale, z);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }

    /// AABB единичного куба после масштаба
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = Vec3::broadcast(0.5 * self.scale);
        (self.position - half, self.position + half)
    }
}

/// Таблица ID -> индекс объекта, действительна один кадр
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickTable {
    slots: Vec<usize>,
}

impl PickTable {
    /// Нумерует pickable-объекты с 1 в порядке сцены
    pub fn assign(objects: &[SceneObject]) -> Self {
        let slots = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.pickable)
            .map(|(i, _)| i)
            .collect();
        Self { slots }
    }

    /// Пары (индекс объекта, ID)
    pub fn iter(&self) -> impl Iterator<Item = (usize, PickId)> + '_ {
        self.slots.iter().enumerate().filter_map(|(n, &index)| {
            PickId::new(n as u32 + 1).map(|id| (index, id))
        })
    }

    pub fn id_of(&self, object_index: usize) -> Option<PickId> {
        self.iter().find(|(i, _)| *i == object_index).map(|(_, id)| id)
    }

    pub fn resolve(&self, id: PickId) -> Option<usize> {
        self.slots.get(id.get() as usize - 1).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(f32);
    impl HeightSampler for Flat {
        fn height_at(&self, _x: f32, _z: f32) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_pick_id_zero_is_reserved() {
        assert!(PickId::new(0).is_none());
        assert_eq!(PickId::new(3).map(PickId::get), Some(3));
    }

    #[test]
    fn test_ids_are_sequential_and_skip_unpickable() {
        let mut objects = vec![
            SceneObject::cube(Vec3::zero(), 1.0),
            SceneObject::cube(Vec3::zero(), 1.0),
            SceneObject::cube(Vec3::zero(), 1.0),
        ];
        objects[1].pickable = false;
        let table = PickTable::assign(&objects);
        let pairs: Vec<(usize, u32)> = table.iter().map(|(i, id)| (i, id.get())).collect();
        assert_eq!(pairs, vec![(0, 1), (2, 2)]);
        assert_eq!(table.resolve(PickId::new(2).unwrap()), Some(2));
        assert_eq!(table.resolve(PickId::new(3).unwrap()), None);
        assert_eq!(table.id_of(1), None);
        // тот же порядок на следующем кадре
        assert_eq!(PickTable::assign(&objects), table);
    }

    #[test]
    fn test_placement_sits_on_terrain() {
        let object = SceneObject::placed(&Flat(2.0), &ObjectPlacement { x: 1.0, z: -1.0, scale: 0.3 });
        assert!((object.position.y - 2.15).abs() < 1e-6);
        assert_eq!(object.position.x, 1.0);
    }
}
