use crate::gpu::objects::{PickTable, SceneObject};
use crate::gpu::render::lights::PointLight;
use crate::gpu::render::uniforms::ObjectUniform;

pub const OBJECT_COLOR: [f32; 3] = [0.85, 0.35, 0.2];
pub const SELECTED_HIGHLIGHT: f32 = 0.5;
pub const HOVER_HIGHLIGHT: f32 = 0.2;
pub const MARKER_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Слот объекта `index` в буфере (0 занят террейном)
pub fn object_slot(index: usize) -> usize {
    index + 1
}

/// Слот маркера `index` при `object_count` объектах
pub fn marker_slot(object_count: usize, index: usize) -> usize {
    object_slot(object_count) + index
}

/// Маркеры света: не пикаются, ID объекта 0
pub fn marker_slots(object_count: usize, lights: &[PointLight]) -> Vec<ObjectUniform> {
    lights
        .iter()
        .enumerate()
        .map(|(index, light)| ObjectUniform {
            model: light.marker_matrix().into(),
            color: MARKER_COLOR,
            highlight: 0.0,
            object_id: 0,
            draw_id: marker_slot(object_count, index) as u32,
            _pad: [0; 2],
        })
        .collect()
}

/// Слот 0 - террейн, дальше объекты по порядку сцены.
/// draw_id = номер слота, object_id = ID пикинга или 0.
pub fn object_slots(
    objects: &[SceneObject],
    picks: &PickTable,
    selected: Option<usize>,
    hovered: Option<usize>,
) -> Vec<ObjectUniform> {
    let mut slots = Vec::with_capacity(objects.len() + 1);
    slots.push(ObjectUniform::terrain());

    for (index, object) in objects.iter().enumerate() {
        let highlight = if selected == Some(index) {
            SELECTED_HIGHLIGHT
        } else if hovered == Some(index) {
            HOVER_HIGHLIGHT
        } else {
            0.0
        };
        slots.push(ObjectUniform {
            model: object.model_matrix().into(),
            color: OBJECT_COLOR,
            highlight,
            object_id: picks.id_of(index).map_or(0, |id| id.get()),
            draw_id: object_slot(index) as u32,
            _pad: [0; 2],
        });
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn test_terrain_first_then_objects() {
        let mut objects = vec![
            SceneObject::cube(Vec3::new(1.0, 0.0, 0.0), 1.0),
            SceneObject::cube(Vec3::new(2.0, 0.0, 0.0), 1.0),
        ];
        objects[0].pickable = false;
        let picks = PickTable::assign(&objects);
        let slots = object_slots(&objects, &picks, Some(1), None);

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].object_id, 0);
        assert_eq!(slots[1].object_id, 0);
        assert_eq!(slots[2].object_id, 1);
        assert_eq!(slots[2].draw_id, 2);
        assert_eq!(slots[2].highlight, SELECTED_HIGHLIGHT);
        assert_eq!(slots[2].model[3][0], 2.0);
    }

    #[test]
    fn test_hover_does_not_override_selection() {
        let objects = vec![SceneObject::cube(Vec3::zero(), 1.0)];
        let picks = PickTable::assign(&objects);
        let slots = object_slots(&objects, &picks, Some(0), Some(0));
        assert_eq!(slots[1].highlight, SELECTED_HIGHLIGHT);
        let slots = object_slots(&objects, &picks, None, Some(0));
        assert_eq!(slots[1].highlight, HOVER_HIGHLIGHT);
    }

    #[test]
    fn test_markers_follow_objects() {
        let objects = vec![SceneObject::cube(Vec3::zero(), 1.0); 2];
        let picks = PickTable::assign(&objects);
        let lights = [PointLight::at([2.0, 3.0, 2.0]), PointLight::at([0.0, 1.5, -3.0])];

        let mut slots = object_slots(&objects, &picks, None, None);
        slots.extend(marker_slots(objects.len(), &lights));

        assert_eq!(marker_slot(objects.len(), 0), 3);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[3].object_id, 0);
        assert_eq!(slots[4].draw_id, 4);
        assert_eq!(slots[4].model[3][2], -3.0);
        assert_eq!(slots[3].model[0][0], crate::gpu::render::lights::MARKER_SCALE);
    }
}
