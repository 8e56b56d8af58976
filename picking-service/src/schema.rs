diesel::table! {
    orders (id) {
        id -> Uuid,
        order_number -> Varchar,
        status -> Varchar,
        total_amount -> Numeric,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    order_items (id) {
        id -> Uuid,
        order_id -> Uuid,
        product_variant_id -> Uuid,
        sku -> Varchar,
        quantity -> Int4,
    }
}

diesel::table! {
    back_orders (id) {
        id -> Uuid,
        order_id -> Uuid,
        product_variant_id -> Uuid,
        sku -> Varchar,
        quantity_back_ordered -> Int4,
        quantity_fulfilled -> Int4,
        status -> Varchar,
    }
}

diesel::table! {
    inventory_reservations (id) {
        id -> Uuid,
        order_id -> Uuid,
        product_variant_id -> Uuid,
        location -> Varchar,
        quantity -> Int4,
        status -> Varchar,
    }
}

diesel::table! {
    pick_lists (id) {
        id -> Uuid,
        batch_number -> Varchar,
        status -> Varchar,
        assigned_to -> Nullable<Varchar>,
        total_items -> Int4,
        notes -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    pick_list_items (id) {
        id -> Uuid,
        pick_list_id -> Uuid,
        order_id -> Uuid,
        product_variant_id -> Uuid,
        sku -> Varchar,
        location -> Varchar,
        quantity_to_pick -> Int4,
        quantity_picked -> Int4,
        pick_sequence -> Int4,
    }
}

diesel::table! {
    pick_events (id) {
        id -> Uuid,
        pick_list_id -> Uuid,
        event_type -> Varchar,
        payload -> Jsonb,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    orders,
    order_items,
    back_orders,
    inventory_reservations,
    pick_lists,
    pick_list_items,
    pick_events,
);
