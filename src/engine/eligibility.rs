// ==========================================
// 电解铝出铝排产系统 - 配包准入引擎
// ==========================================
// 职责: 按牌号筛选可配包槽 + 条件查询 + 确定性排序
// 输入: 已评估槽 + 牌号约束 + 排除集合 (已占用) + 查询条件
// 输出: 候选槽列表 (评分降序, 槽号升序)
// 红线: 停槽/危险槽不得进入候选池; 只读, 不修改槽
// ==========================================

use crate::domain::grade::GradeConstraints;
use crate::domain::pot::Pot;
use crate::domain::types::RiskLevel;
use std::collections::HashSet;

// ==========================================
// PotQuery - 候选槽查询条件
// ==========================================
// 全部条件缺省 = 不过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotQuery {
    pub phase: Option<u8>,
    pub areas: Vec<String>,
    pub risk_levels: Vec<RiskLevel>,
    /// 槽号子串 (不区分大小写)
    pub search: Option<String>,
    pub fe_range: Option<(f64, f64)>,
    pub si_range: Option<(f64, f64)>,
}

impl PotQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(mut self, phase: u8) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.areas.push(area.into());
        self
    }

    pub fn risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_levels.push(level);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn fe_range(mut self, min: f64, max: f64) -> Self {
        self.fe_range = Some((min, max));
        self
    }

    pub fn si_range(mut self, min: f64, max: f64) -> Self {
        self.si_range = Some((min, max));
        self
    }

    /// 单槽是否命中查询条件
    pub fn matches(&self, pot: &Pot) -> bool {
        if let Some(phase) = self.phase {
            if pot.phase != phase {
                return false;
            }
        }
        if !self.areas.is_empty() && !self.areas.iter().any(|a| a == &pot.area) {
            return false;
        }
        if !self.risk_levels.is_empty() {
            match pot.risk_level {
                Some(level) if self.risk_levels.contains(&level) => {}
                _ => return false,
            }
        }
        if let Some(text) = &self.search {
            if !pot.id.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        if let Some((min, max)) = self.fe_range {
            if pot.metrics.fe < min || pot.metrics.fe > max {
                return false;
            }
        }
        if let Some((min, max)) = self.si_range {
            if pot.metrics.si < min || pot.metrics.si > max {
                return false;
            }
        }
        true
    }
}

// ==========================================
// EligibilityFilter - 配包准入引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityFilter;

impl EligibilityFilter {
    pub fn new() -> Self {
        Self
    }

    /// 槽是否可参与配包 (停槽/危险槽除外)
    pub fn is_allocatable(pot: &Pot) -> bool {
        !matches!(
            pot.risk_level,
            Some(RiskLevel::Shutdown) | Some(RiskLevel::Critical)
        )
    }

    /// 筛选某牌号的候选槽
    ///
    /// # 参数
    /// - `pots`: 槽池
    /// - `constraints`: 目标牌号约束 (单槽 Fe/Si 必须已满足)
    /// - `excluded`: 已被占用的槽号
    /// - `query`: 附加查询条件
    ///
    /// # 返回
    /// 候选槽 (评分降序, 槽号升序)
    pub fn eligible_pots_for_grade<'a, I>(
        &self,
        pots: I,
        constraints: &GradeConstraints,
        excluded: &HashSet<&str>,
        query: Option<&PotQuery>,
    ) -> Vec<&'a Pot>
    where
        I: IntoIterator<Item = &'a Pot>,
    {
        let mut candidates: Vec<&Pot> = pots
            .into_iter()
            .filter(|p| Self::is_allocatable(p))
            .filter(|p| !excluded.contains(p.id.as_str()))
            .filter(|p| constraints.admits(p.metrics.fe, p.metrics.si))
            .filter(|p| query.map_or(true, |q| q.matches(p)))
            .collect();
        sort_by_score(&mut candidates);
        candidates
    }

    /// 条件查询 (不按牌号过滤, 仅排序)
    pub fn query<'a, I>(&self, pots: I, query: &PotQuery) -> Vec<&'a Pot>
    where
        I: IntoIterator<Item = &'a Pot>,
    {
        let mut hits: Vec<&Pot> = pots.into_iter().filter(|p| query.matches(p)).collect();
        sort_by_score(&mut hits);
        hits
    }
}

/// 评分降序, 槽号升序
///
/// total_cmp 保证全序, 非有限评分不会使排序失效
pub fn sort_by_score(pots: &mut [&Pot]) {
    pots.sort_by(|a, b| b.score().total_cmp(&a.score()).then_with(|| a.id.cmp(&b.id)));
}
