// ============================================
// Frame Plan - Фиксированный порядок проходов кадра
// ============================================
// Отражение -> преломление -> тени -> (пикинг) -> финал.
// Порядок задаётся здесь и больше нигде.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenePass {
    Reflection,
    Refraction,
    Shadow,
    Picking,
    Final,
}

impl ScenePass {
    pub const COUNT: usize = 5;

    pub const ORDER: [ScenePass; Self::COUNT] = [
        ScenePass::Reflection,
        ScenePass::Refraction,
        ScenePass::Shadow,
        ScenePass::Picking,
        ScenePass::Final,
    ];

    /// Индекс буфера PassUniform этого прохода
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ScenePass::Reflection => "Reflection Pass",
            ScenePass::Refraction => "Refraction Pass",
            ScenePass::Shadow => "Shadow Pass",
            ScenePass::Picking => "Picking Pass",
            ScenePass::Final => "Final Pass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    passes: Vec<ScenePass>,
}

impl FramePlan {
    /// Пикинг только если он нужен в этом кадре
    pub fn for_frame(picking: bool) -> Self {
        let passes = ScenePass::ORDER
            .iter()
            .copied()
            .filter(|&pass| picking || pass != ScenePass::Picking)
            .collect();
        Self { passes }
    }

    pub fn passes(&self) -> &[ScenePass] {
        &self.passes
    }

    pub fn includes(&self, pass: ScenePass) -> bool {
        self.passes.contains(&pass)
    }
}

/// Номер кадра, в котором каждая цель была записана последний раз
#[derive(Debug, Clone, Default)]
pub struct FrameLedger {
    frame: u64,
    written: [Option<u64>; ScenePass::COUNT],
}

impl FrameLedger {
    pub fn begin_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    pub fn mark_written(&mut self, pass: ScenePass) {
        self.written[pass.index()] = Some(self.frame);
    }

    pub fn is_fresh(&self, pass: ScenePass) -> bool {
        self.written[pass.index()] == Some(self.frame)
    }

    /// Финалу нужны отражение, преломление и тени этого кадра
    pub fn final_inputs_fresh(&self) -> bool {
        [ScenePass::Reflection, ScenePass::Refraction, ScenePass::Shadow]
            .iter()
            .all(|&pass| self.is_fresh(pass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_order_without_picking() {
        let plan = FramePlan::for_frame(false);
        assert_eq!(
            plan.passes(),
            &[ScenePass::Reflection, ScenePass::Refraction, ScenePass::Shadow, ScenePass::Final]
        );
        assert!(!plan.includes(ScenePass::Picking));
    }

    #[test]
    fn test_plan_order_with_picking() {
        let plan = FramePlan::for_frame(true);
        assert_eq!(plan.passes(), &ScenePass::ORDER);
        assert_eq!(plan.passes().last(), Some(&ScenePass::Final));
    }

    #[test]
    fn test_pass_indices_are_distinct() {
        let indices: Vec<usize> = ScenePass::ORDER.iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_ledger_tracks_freshness_per_frame() {
        let mut ledger = FrameLedger::default();
        ledger.begin_frame();
        for pass in FramePlan::for_frame(false).passes() {
            ledger.mark_written(*pass);
        }
        assert!(ledger.final_inputs_fresh());
        assert!(!ledger.is_fresh(ScenePass::Picking));

        // следующий кадр: прошлые записи устарели
        ledger.begin_frame();
        assert!(!ledger.final_inputs_fresh());
        ledger.mark_written(ScenePass::Reflection);
        ledger.mark_written(ScenePass::Refraction);
        assert!(!ledger.final_inputs_fresh());
        ledger.mark_written(ScenePass::Shadow);
        assert!(ledger.final_inputs_fresh());
    }
}
