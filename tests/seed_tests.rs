//! Seed text and level table tests

mod support;

#[cfg(test)]
mod tests {
    use super::support::assert_close;
    use gift_hunt::codec::{encode_segment, pack_aux};
    use gift_hunt::level::{LevelEntry, LevelTableError};
    use gift_hunt::{GiftError, LevelId, LevelTokenMap, Position, SeedCodec, StaticLevelTable};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    const CAP: u32 = 600_000;

    fn codec() -> SeedCodec {
        SeedCodec::new(Arc::new(StaticLevelTable::builtin()), CAP)
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn movement() -> LevelId {
        LevelId::new("TUT_MOVEMENT")
    }

    // -----------------------------------------------------------------------
    // Encode / decode
    // -----------------------------------------------------------------------

    #[test]
    fn seed_shape_without_aux() {
        let seed = codec()
            .encode(Position::zero(), &movement(), None, &mut rng())
            .unwrap();
        let parts: Vec<&str> = seed.split(':').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "Movement");
        assert_eq!(parts[1].len(), 11);
        assert!(!seed.contains('='));
    }

    #[test]
    fn seed_round_trips_with_aux() {
        let codec = codec();
        let p = Position::new(12.5, 3.0, -40.2);
        let seed = codec.encode(p, &movement(), Some(12_345), &mut rng()).unwrap();

        let decoded = codec.decode(&seed).unwrap();
        assert_eq!(decoded.level, movement());
        assert_eq!(decoded.aux_ms, Some(12_345));
        assert_eq!(decoded.text, seed);
        assert_close(decoded.position, p);
    }

    #[test]
    fn known_seed_decodes() {
        let decoded = codec().decode("Movement:qWAH2AB5/m4:MEk").unwrap();
        assert_eq!(decoded.level, movement());
        assert_eq!(decoded.aux_ms, Some(12_361));
        assert_close(decoded.position, Position::new(12.5, 3.0, -40.2));
    }

    #[test]
    fn tokens_with_spaces_round_trip() {
        let codec = codec();
        let level = LevelId::new("GRID_PORT");
        let seed = codec
            .encode(Position::new(1.0, 2.0, 3.0), &level, None, &mut rng())
            .unwrap();
        assert!(seed.starts_with("Glass Port:"));
        assert_eq!(codec.decode(&seed).unwrap().level, level);
    }

    #[test]
    fn encode_clamps_aux_to_cap() {
        let codec = codec();
        let seed = codec
            .encode(Position::zero(), &movement(), Some(900_000), &mut rng())
            .unwrap();
        assert_eq!(codec.decode(&seed).unwrap().aux_ms, Some(CAP));
    }

    #[test]
    fn encode_rejects_unmapped_level() {
        let err = codec()
            .encode(Position::zero(), &LevelId::new("HUB_HEAVEN"), None, &mut rng())
            .unwrap_err();
        assert_eq!(err, GiftError::InvalidLevel("HUB_HEAVEN".into()));
    }

    #[test]
    fn encode_rejects_out_of_range_position() {
        let err = codec()
            .encode(Position::new(0.0, 20_000.0, 0.0), &movement(), None, &mut rng())
            .unwrap_err();
        assert_eq!(err, GiftError::PositionOutOfRange);
    }

    #[test]
    fn encodings_of_one_position_decode_alike() {
        let codec = codec();
        let mut rng = rng();
        let p = Position::new(-250.0, 18.3, 77.7);

        let seeds: Vec<String> = (0..16)
            .map(|_| codec.encode(p, &movement(), None, &mut rng).unwrap())
            .collect();
        let first = codec.decode(&seeds[0]).unwrap().position;
        for seed in &seeds[1..] {
            assert_eq!(codec.decode(seed).unwrap().position, first);
        }
    }

    // -----------------------------------------------------------------------
    // Lenient parsing
    // -----------------------------------------------------------------------

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let decoded = codec().decode("  Movement:qWAH2AB5/m4:MEk \n").unwrap();
        assert_eq!(decoded.text, "Movement:qWAH2AB5/m4:MEk");
    }

    #[test]
    fn restored_padding_is_accepted() {
        let codec = codec();
        let bare = codec.decode("Movement:qWAH2AB5/m4:MEk").unwrap();
        let padded = codec.decode("Movement:qWAH2AB5/m4=:MEk=").unwrap();
        assert_eq!(bare.position, padded.position);
        assert_eq!(bare.aux_ms, padded.aux_ms);
    }

    #[test]
    fn empty_aux_segment_means_no_aux() {
        let decoded = codec().decode("Movement:qWAH2AB5/m4:").unwrap();
        assert_eq!(decoded.aux_ms, None);
    }

    #[test]
    fn aux_above_cap_is_dropped() {
        let aux = encode_segment(&pack_aux(CAP + 1));
        let decoded = codec()
            .decode(&format!("Movement:qWAH2AB5/m4:{}", aux))
            .unwrap();
        assert_eq!(decoded.aux_ms, None);
    }

    #[test]
    fn aux_at_cap_is_kept() {
        let aux = encode_segment(&pack_aux(CAP));
        let decoded = codec()
            .decode(&format!("Movement:qWAH2AB5/m4:{}", aux))
            .unwrap();
        assert_eq!(decoded.aux_ms, Some(CAP));
    }

    #[test]
    fn undecodable_aux_is_dropped() {
        let codec = codec();
        let five_bytes = encode_segment(&[1, 2, 3, 4, 5]);
        for aux in ["!!", "A", five_bytes.as_str()] {
            let decoded = codec
                .decode(&format!("Movement:qWAH2AB5/m4:{}", aux))
                .unwrap();
            assert_eq!(decoded.aux_ms, None, "aux segment {:?}", aux);
        }
    }

    // -----------------------------------------------------------------------
    // Rejections
    // -----------------------------------------------------------------------

    #[test]
    fn malformed_shapes_are_rejected() {
        let codec = codec();
        for text in ["", "   ", "Movement", "Movement:", ":qWAH2AB5/m4", "a:b:c:d"] {
            assert_eq!(
                codec.decode(text),
                Err(GiftError::Malformed),
                "{:?} should be malformed",
                text
            );
        }
    }

    #[test]
    fn unknown_token_is_invalid_level() {
        assert_eq!(
            codec().decode("Nowhere:AAAA"),
            Err(GiftError::InvalidLevel("Nowhere".into()))
        );
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert_eq!(
            codec().decode("movement:qWAH2AB5/m4"),
            Err(GiftError::InvalidLevel("movement".into()))
        );
    }

    #[test]
    fn short_or_garbled_position_is_rejected() {
        let codec = codec();
        assert_eq!(codec.decode("Movement:AAAA"), Err(GiftError::InvalidPosition));
        assert_eq!(codec.decode("Movement:!!!!"), Err(GiftError::InvalidPosition));
        assert_eq!(
            codec.decode("Movement:AAAAAAAAAAAAAAA"),
            Err(GiftError::InvalidPosition)
        );
    }

    // -----------------------------------------------------------------------
    // update_aux
    // -----------------------------------------------------------------------

    #[test]
    fn update_aux_replaces_only_the_last_segment() {
        let codec = codec();
        let updated = codec.update_aux("Movement:qWAH2AB5/m4:MEk", 250).unwrap();
        assert!(updated.starts_with("Movement:qWAH2AB5/m4:"));
        assert_eq!(codec.decode(&updated).unwrap().aux_ms, Some(250));
    }

    #[test]
    fn update_aux_clamps_to_cap() {
        let codec = codec();
        let updated = codec.update_aux("Movement:qWAH2AB5/m4:MEk", u32::MAX).unwrap();
        assert_eq!(codec.decode(&updated).unwrap().aux_ms, Some(CAP));
    }

    #[test]
    fn update_aux_needs_an_existing_aux_segment() {
        let codec = codec();
        assert_eq!(
            codec.update_aux("Movement:qWAH2AB5/m4", 10),
            Err(GiftError::Malformed)
        );
        assert_eq!(
            codec.update_aux("Movement:qWAH2AB5/m4:", 10),
            Err(GiftError::Malformed)
        );
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn only_gate_rejections_are_silent() {
        assert!(GiftError::CooldownActive.is_silent());
        assert!(GiftError::EmptySeed.is_silent());
        assert!(GiftError::Disabled.is_silent());
        assert!(!GiftError::Malformed.is_silent());
        assert!(!GiftError::RestrictedMode.is_silent());
        assert!(!GiftError::TooCloseToSpawn.is_silent());
    }

    #[test]
    fn error_text_is_player_facing() {
        assert_eq!(GiftError::Malformed.to_string(), "Invalid gift seed.");
        assert_eq!(
            GiftError::InvalidLevel("X".into()).to_string(),
            "Invalid level `X`."
        );
        assert_eq!(
            GiftError::MenuState(gift_hunt::MenuState::Title).to_string(),
            "Cannot load level from menu 'Title'."
        );
    }

    // -----------------------------------------------------------------------
    // Level table
    // -----------------------------------------------------------------------

    #[test]
    fn builtin_table_maps_both_ways() {
        let table = StaticLevelTable::builtin();
        assert_eq!(table.len(), 24);
        assert_eq!(table.token_for(&movement()), Some("Movement"));
        assert_eq!(table.level_id_for("Movement"), Some(movement()));
        assert_eq!(table.level_id_for("Unknown"), None);
    }

    #[test]
    fn green_memories_are_campaign_gated() {
        let table = StaticLevelTable::builtin();
        assert!(table.requires_campaign(&LevelId::new("SIDEQUEST_GREEN_MEMORY_2")));
        assert!(!table.requires_campaign(&movement()));
    }

    #[test]
    fn table_rejects_bad_entries() {
        let entry = |id: &str, token: &str| LevelEntry {
            id: LevelId::new(id),
            token: token.into(),
            campaign_gated: false,
        };

        let mut table = StaticLevelTable::builtin();
        assert!(matches!(
            table.insert(entry("TUT_MOVEMENT", "Other")),
            Err(LevelTableError::DuplicateId(_))
        ));
        assert!(matches!(
            table.insert(entry("NEW_LEVEL", "Movement")),
            Err(LevelTableError::DuplicateToken(_))
        ));
        assert!(matches!(
            table.insert(entry("NEW_LEVEL", "a:b")),
            Err(LevelTableError::InvalidToken(_))
        ));
        assert!(matches!(
            table.insert(entry("NEW_LEVEL", " ")),
            Err(LevelTableError::InvalidToken(_))
        ));
        assert!(table.insert(entry("NEW_LEVEL", "Fresh Token")).is_ok());
        assert_eq!(table.len(), 25);
    }

    #[test]
    fn table_parses_json() {
        let table = StaticLevelTable::from_json_str(
            r#"{ "levels": [ { "id": "A", "token": "Alpha", "campaign_gated": true } ] }"#,
        )
        .unwrap();
        assert_eq!(table.token_for(&LevelId::new("A")), Some("Alpha"));
        assert!(table.requires_campaign(&LevelId::new("A")));

        assert!(matches!(
            StaticLevelTable::from_json_str("{ not json"),
            Err(LevelTableError::Parse(_))
        ));
    }

    #[test]
    fn entries_are_sorted_by_token() {
        let tokens: Vec<String> = StaticLevelTable::builtin()
            .entries()
            .into_iter()
            .map(|e| e.token)
            .collect();
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(tokens, sorted);
    }
}
