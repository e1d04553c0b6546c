//! Voice catalog
//!
//! The synthesizer voices the backends accept, addressable by catalog name
//! or by raw voice id. Voice validity is checked here before any network
//! call; an unknown voice never reaches an endpoint.

/// A synthesizer voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    /// Catalog name (e.g. `GHOSTFACE`)
    pub name: &'static str,
    /// Backend voice id (e.g. `en_us_ghostface`)
    pub id: &'static str,
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Every voice the backends accept.
pub const CATALOG: &[Voice] = &[
    // Disney voices
    Voice { name: "GHOSTFACE", id: "en_us_ghostface" },
    Voice { name: "CHEWBACCA", id: "en_us_chewbacca" },
    Voice { name: "C3PO", id: "en_us_c3po" },
    Voice { name: "STITCH", id: "en_us_stitch" },
    Voice { name: "STORMTROOPER", id: "en_us_stormtrooper" },
    Voice { name: "ROCKET", id: "en_us_rocket" },
    // English voices
    Voice { name: "PIRATE", id: "en_male_pirate" },
    Voice { name: "GHOSTHOST", id: "en_male_ghosthost" },
    Voice { name: "MADAMELEOTA", id: "en_female_madam_leota" },
    Voice { name: "MAGICIAN", id: "en_male_wizard" },
    Voice { name: "SANTANARATION", id: "en_male_santa_narration" },
    Voice { name: "GRANNY", id: "en_female_grandma" },
    Voice { name: "CUPID", id: "en_male_cupid" },
    Voice { name: "BAE", id: "en_female_betty" },
    Voice { name: "MARTY", id: "en_male_trevor" },
    Voice { name: "VARSITY", id: "en_female_pansino" },
    Voice { name: "DEBUTANTE", id: "en_female_shenna" },
    Voice { name: "BUTLER", id: "en_male_ukbutler" },
    Voice { name: "LORDCRINGE", id: "en_male_ukneighbor" },
    Voice { name: "OLANTEKKERS", id: "en_male_olantekkers" },
    Voice { name: "ASHMAGIC", id: "en_male_ashmagic" },
    Voice { name: "ALFRED", id: "en_male_jarvis" },
    Voice { name: "TRICKSTER", id: "en_male_grinch" },
    Voice { name: "BESTIE", id: "en_female_richgirl" },
    Voice { name: "BEAUTY", id: "en_female_makeup" },
    Voice { name: "MALESERIOUS", id: "en_male_cody" },
    Voice { name: "GAMEON", id: "en_male_jomboy" },
    Voice { name: "DEADPOOL", id: "en_male_deadpool" },
    Voice { name: "EN_AU_FEMALE_1", id: "en_au_001" },
    Voice { name: "EN_AU_MALE_1", id: "en_au_002" },
    Voice { name: "EN_UK_MALE_1", id: "en_uk_001" },
    Voice { name: "EN_UK_MALE_2", id: "en_uk_003" },
    Voice { name: "EN_US_FEMALE_1", id: "en_us_001" },
    Voice { name: "EN_US_FEMALE_2", id: "en_us_002" },
    Voice { name: "EN_US_MALE_1", id: "en_us_006" },
    Voice { name: "EN_US_MALE_2", id: "en_us_007" },
    Voice { name: "EN_US_MALE_3", id: "en_us_009" },
    Voice { name: "EN_US_MALE_4", id: "en_us_010" },
    // European voices
    Voice { name: "FR_MALE_1", id: "fr_001" },
    Voice { name: "FR_MALE_2", id: "fr_002" },
    Voice { name: "DE_FEMALE", id: "de_001" },
    Voice { name: "DE_MALE", id: "de_002" },
    Voice { name: "ES_MALE", id: "es_002" },
    // American voices
    Voice { name: "ES_MX_MALE", id: "es_mx_002" },
    Voice { name: "BR_FEMALE_1", id: "br_001" },
    Voice { name: "BR_FEMALE_2", id: "br_003" },
    Voice { name: "BR_FEMALE_3", id: "br_004" },
    Voice { name: "BR_MALE", id: "br_005" },
    // Asian voices
    Voice { name: "ID_FEMALE", id: "id_001" },
    Voice { name: "JP_FEMALE_1", id: "jp_001" },
    Voice { name: "JP_FEMALE_2", id: "jp_003" },
    Voice { name: "JP_FEMALE_3", id: "jp_005" },
    Voice { name: "JP_MALE", id: "jp_006" },
    Voice { name: "KR_MALE_1", id: "kr_002" },
    Voice { name: "KR_FEMALE", id: "kr_003" },
    Voice { name: "KR_MALE_2", id: "kr_004" },
    // Singing voices
    Voice { name: "EN_FEMALE_ALTO", id: "en_female_f08_salut_damour" },
    Voice { name: "EN_MALE_TENOR", id: "en_male_m03_lobby" },
    Voice { name: "EN_FEMALE_WARMY_BREEZE", id: "en_female_f08_warmy_breeze" },
    Voice { name: "EN_MALE_SUNSHINE_SOON", id: "en_male_m03_sunshine_soon" },
    // Other
    Voice { name: "EN_MALE_NARRATION", id: "en_male_narration" },
    Voice { name: "EN_MALE_FUNNY", id: "en_male_funny" },
    Voice { name: "EN_FEMALE_EMOTIONAL", id: "en_female_emotional" },
];

/// Look up a voice by its catalog name.
pub fn by_name(name: &str) -> Option<Voice> {
    CATALOG.iter().copied().find(|voice| voice.name == name)
}

/// Look up a voice by its raw backend id.
pub fn by_id(id: &str) -> Option<Voice> {
    CATALOG.iter().copied().find(|voice| voice.id == id)
}

/// Resolve either a catalog name or a raw voice id.
pub fn resolve(input: &str) -> Option<Voice> {
    by_id(input).or_else(|| by_name(input))
}
