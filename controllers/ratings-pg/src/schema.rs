table! {
    ratings (user_id, music_id) {
        user_id -> Varchar,
        music_id -> Varchar,
        rating -> Float8,
    }
}
