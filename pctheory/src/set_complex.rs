// Set complexes about a nexus set-class.
//
// K(nexus) gathers every set-class X (other than the nexus) such that X is
// an abstract subset-class of the nexus or the nexus is an abstract
// subset-class of X. The subset side comes from the nexus's own subset
// enumeration; the superset side tests the nexus against every catalogued
// class of larger cardinality. Kh(nexus) is K(nexus) ∪ K(complement), less
// the nexus itself, so it always contains K(nexus).
//
// The nexus decides the registry; a config naming a different group is
// rejected. Candidates outside the configured cardinality window are
// dropped. One `ClassificationCache` serves the whole construction,
// including both K computations inside Kh, and is discarded with it.
//
// Results are sorted by cardinality then Forte number and deduplicated by
// set-class identity.

use crate::config::EngineConfig;
use crate::error::{PcError, Result};
use crate::setclass::{ClassificationCache, SetClass};
use rayon::prelude::*;
use serde::Serialize;

/// Which relation built the complex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ComplexKind {
    K,
    Kh,
}

#[derive(Clone, Debug, Serialize)]
pub struct SetComplex {
    kind: ComplexKind,
    nexus: SetClass,
    members: Vec<SetClass>,
}

impl SetComplex {
    /// K about `nexus` with the default configuration for its group.
    pub fn k(nexus: &SetClass) -> Result<SetComplex> {
        Self::k_with(nexus, &default_for(nexus))
    }

    /// Kh about `nexus` with the default configuration for its group.
    pub fn kh(nexus: &SetClass) -> Result<SetComplex> {
        Self::kh_with(nexus, &default_for(nexus))
    }

    pub fn k_with(nexus: &SetClass, config: &EngineConfig) -> Result<SetComplex> {
        check_config(nexus, config)?;
        let cache = ClassificationCache::new(nexus.group());
        let catalog = SetClass::catalog(nexus.group())?;
        let members = k_members(nexus, &catalog, &cache, config)?;
        log::debug!("K({}) has {} members", nexus.name_forte(), members.len());
        Ok(SetComplex {
            kind: ComplexKind::K,
            nexus: nexus.clone(),
            members,
        })
    }

    pub fn kh_with(nexus: &SetClass, config: &EngineConfig) -> Result<SetComplex> {
        check_config(nexus, config)?;
        let cache = ClassificationCache::new(nexus.group());
        let catalog = SetClass::catalog(nexus.group())?;
        let complement = nexus.complement()?;
        let mut members = k_members(nexus, &catalog, &cache, config)?;
        members.extend(
            k_members(&complement, &catalog, &cache, config)?
                .into_iter()
                .filter(|sc| sc != nexus),
        );
        members.sort();
        members.dedup();
        let (hits, misses) = cache.stats();
        log::debug!(
            "Kh({}) has {} members (cache: {hits} hits, {misses} misses)",
            nexus.name_forte(),
            members.len()
        );
        Ok(SetComplex {
            kind: ComplexKind::Kh,
            nexus: nexus.clone(),
            members,
        })
    }

    pub fn kind(&self) -> ComplexKind {
        self.kind
    }

    pub fn nexus(&self) -> &SetClass {
        &self.nexus
    }

    pub fn members(&self) -> &[SetClass] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SetClass> {
        self.members.iter()
    }

    pub fn contains(&self, class: &SetClass) -> bool {
        self.members.binary_search(class).is_ok()
    }
}

impl<'a> IntoIterator for &'a SetComplex {
    type Item = &'a SetClass;
    type IntoIter = std::slice::Iter<'a, SetClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

fn default_for(nexus: &SetClass) -> EngineConfig {
    EngineConfig {
        group: nexus.group(),
        ..Default::default()
    }
}

fn check_config(nexus: &SetClass, config: &EngineConfig) -> Result<()> {
    config.validate()?;
    if config.group != nexus.group() {
        return Err(PcError::Config(format!(
            "nexus {} was classified under {:?} but the config names {:?}",
            nexus.name_forte(),
            nexus.group(),
            config.group
        )));
    }
    Ok(())
}

/// Sorted, deduplicated K relation about `nexus`, excluding the nexus.
fn k_members(
    nexus: &SetClass,
    catalog: &[SetClass],
    cache: &ClassificationCache,
    config: &EngineConfig,
) -> Result<Vec<SetClass>> {
    let mut members: Vec<SetClass> = nexus
        .abstract_subset_classes_with(cache, config.parallel)?
        .into_iter()
        .filter(|sc| config.admits(sc.len()))
        .collect();

    let larger = catalog
        .iter()
        .filter(|sc| sc.len() > nexus.len() && config.admits(sc.len()));
    let supersets: Vec<SetClass> = if config.parallel {
        larger
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter(|sc| nexus.is_abstract_subset_of(sc))
            .cloned()
            .collect()
    } else {
        larger
            .filter(|sc| nexus.is_abstract_subset_of(sc))
            .cloned()
            .collect()
    };
    members.extend(supersets);
    members.sort();
    members.dedup();
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcset;
    use crate::transformations::GroupKind;

    #[test]
    fn k_of_ath() {
        let nexus = SetClass::load_from_name("6-Z17").unwrap();
        let k = SetComplex::k(&nexus).unwrap();
        assert_eq!(k.kind(), ComplexKind::K);
        assert!(!k.contains(&nexus));
        // Every trichord is a subset of the all-trichord hexachord.
        assert_eq!(k.iter().filter(|sc| sc.len() == 3).count(), 12);
        assert!(k.members().windows(2).all(|w| w[0] < w[1]));
        for member in &k {
            assert!(member.is_abstract_subset_of(&nexus) || nexus.is_abstract_subset_of(member));
        }
    }

    #[test]
    fn kh_contains_k() {
        for name in ["6-Z17", "4-28", "5-35", "3-11", "7-Z12"] {
            let nexus = SetClass::load_from_name(name).unwrap();
            let k = SetComplex::k(&nexus).unwrap();
            let kh = SetComplex::kh(&nexus).unwrap();
            assert!(kh.len() >= k.len());
            for member in &k {
                assert!(kh.contains(member), "{name}: {member:?} missing from Kh");
            }
        }
    }

    #[test]
    fn kh_adds_complement_relations() {
        let nexus = SetClass::load_from_name("6-Z17").unwrap();
        let complement = nexus.complement().unwrap();
        let kh = SetComplex::kh(&nexus).unwrap();
        let k_comp = SetComplex::k(&complement).unwrap();
        for member in &k_comp {
            assert!(kh.contains(member));
        }
    }

    #[test]
    fn kh_excludes_nexus_related_to_its_complement() {
        // Each of these is an abstract subset of its own complement.
        for name in ["4-28", "3-12", "5-35"] {
            let nexus = SetClass::load_from_name(name).unwrap();
            let complement = nexus.complement().unwrap();
            assert!(nexus.is_abstract_subset_of(&complement), "{name}");
            let k = SetComplex::k(&nexus).unwrap();
            let kh = SetComplex::kh(&nexus).unwrap();
            assert!(!k.contains(&nexus), "{name}");
            assert!(!kh.contains(&nexus), "{name}");
            assert!(kh.contains(&complement), "{name}");
            for member in &k {
                assert!(kh.contains(member), "{name}");
            }
        }
    }

    #[test]
    fn config_group_must_match_nexus() {
        let nexus = SetClass::load_from_name("6-Z17").unwrap();
        let full = EngineConfig {
            group: GroupKind::Full,
            ..Default::default()
        };
        assert!(matches!(SetComplex::k_with(&nexus, &full), Err(PcError::Config(_))));
        assert!(matches!(SetComplex::kh_with(&nexus, &full), Err(PcError::Config(_))));
        let full_nexus = SetClass::load_from_name_in("6-Z17", GroupKind::Full).unwrap();
        assert!(SetComplex::k_with(&full_nexus, &full).is_ok());
    }

    #[test]
    fn cardinality_window() {
        let nexus = SetClass::load_from_name("4-Z15").unwrap();
        let config = EngineConfig {
            min_cardinality: 3,
            max_cardinality: 9,
            ..Default::default()
        };
        let k = SetComplex::k_with(&nexus, &config).unwrap();
        assert!(k.iter().all(|sc| (3..=9).contains(&sc.len())));
        let all = SetComplex::k(&nexus).unwrap();
        assert!(all.iter().any(|sc| sc.len() == 1));
        assert!(all.iter().any(|sc| sc.len() == 11));
        assert!(all.iter().all(|sc| sc.len() != 12));
    }

    #[test]
    fn serial_matches_parallel() {
        let nexus = SetClass::new(pcset![0, 1, 4, 6]).unwrap();
        let serial = EngineConfig {
            parallel: false,
            ..Default::default()
        };
        let a = SetComplex::kh(&nexus).unwrap();
        let b = SetComplex::kh_with(&nexus, &serial).unwrap();
        assert_eq!(a.members(), b.members());
    }

    #[test]
    fn full_group_complex() {
        let nexus = SetClass::load_from_name_in("6-Z17", GroupKind::Full).unwrap();
        let k = SetComplex::k(&nexus).unwrap();
        assert!(k.iter().all(|sc| sc.group() == GroupKind::Full));
        // M5 merges trichord classes pairwise where they differ, so fewer than 12.
        assert!(k.iter().filter(|sc| sc.len() == 3).count() < 12);
    }

    #[test]
    fn null_nexus_reaches_everything_in_window() {
        let nexus = SetClass::new(crate::pcset::PitchClassSet::empty()).unwrap();
        let k = SetComplex::k(&nexus).unwrap();
        // Every class of cardinality 1..=11 contains the null set.
        assert_eq!(k.len(), 224 - 2);
    }
}
