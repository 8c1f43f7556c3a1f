//! GraphQL documents for the Admin API.
//!
//! Selections here must stay in sync with the response shapes in
//! [`super::types`]. Connections select `nodes` directly since nothing
//! here paginates past the first page.

pub const GET_ORDER: &str = r"
query GetOrder($id: ID!) {
    order(id: $id) {
        id
        name
        createdAt
        note
        tags
        displayFinancialStatus
        totalPriceSet { shopMoney { amount currencyCode } }
        totalOutstandingSet { shopMoney { amount currencyCode } }
        customer { email firstName lastName phone }
        customAttributes { key value }
        lineItems(first: 50) {
            nodes {
                id
                title
                quantity
                originalTotalSet { shopMoney { amount currencyCode } }
                sellingPlan { sellingPlanId name }
                customAttributes { key value }
            }
        }
        transactions(first: 20) {
            id
            kind
            status
            amountSet { shopMoney { amount currencyCode } }
            createdAt
        }
    }
}";

pub const SEARCH_ORDERS: &str = r"
query SearchOrders($query: String!, $first: Int!) {
    orders(first: $first, query: $query, sortKey: CREATED_AT, reverse: true) {
        nodes {
            id
            name
            createdAt
            note
            tags
            displayFinancialStatus
            totalPriceSet { shopMoney { amount currencyCode } }
            totalOutstandingSet { shopMoney { amount currencyCode } }
            customer { email firstName lastName phone }
            customAttributes { key value }
            lineItems(first: 50) {
                nodes {
                    id
                    title
                    quantity
                    originalTotalSet { shopMoney { amount currencyCode } }
                    sellingPlan { sellingPlanId name }
                    customAttributes { key value }
                }
            }
            transactions(first: 20) {
                id
                kind
                status
                amountSet { shopMoney { amount currencyCode } }
                createdAt
            }
        }
    }
}";

pub const TAGS_ADD: &str = r"
mutation TagsAdd($id: ID!, $tags: [String!]!) {
    tagsAdd(id: $id, tags: $tags) {
        userErrors { field message }
    }
}";

pub const ORDER_UPDATE_ATTRIBUTES: &str = r"
mutation OrderUpdateAttributes($input: OrderInput!) {
    orderUpdate(input: $input) {
        order { id }
        userErrors { field message }
    }
}";

pub const SELLING_PLAN_GROUP_CREATE: &str = r"
mutation SellingPlanGroupCreate($input: SellingPlanGroupInput!, $resources: SellingPlanGroupResourceInput) {
    sellingPlanGroupCreate(input: $input, resources: $resources) {
        sellingPlanGroup {
            id
            name
            merchantCode
            sellingPlans(first: 5) { nodes { id name } }
        }
        userErrors { field message }
    }
}";

pub const SELLING_PLAN_GROUP_UPDATE: &str = r"
mutation SellingPlanGroupUpdate($id: ID!, $input: SellingPlanGroupInput!) {
    sellingPlanGroupUpdate(id: $id, input: $input) {
        sellingPlanGroup {
            id
            name
            merchantCode
            sellingPlans(first: 5) { nodes { id name } }
        }
        userErrors { field message }
    }
}";

pub const SELLING_PLAN_GROUP_DELETE: &str = r"
mutation SellingPlanGroupDelete($id: ID!) {
    sellingPlanGroupDelete(id: $id) {
        deletedSellingPlanGroupId
        userErrors { field message }
    }
}";

pub const SELLING_PLAN_GROUP_ADD_PRODUCTS: &str = r"
mutation SellingPlanGroupAddProducts($id: ID!, $productIds: [ID!]!) {
    sellingPlanGroupAddProducts(id: $id, productIds: $productIds) {
        sellingPlanGroup { id }
        userErrors { field message }
    }
}";

pub const GET_SELLING_PLAN_GROUPS: &str = r"
query GetSellingPlanGroups($first: Int!) {
    sellingPlanGroups(first: $first) {
        nodes {
            id
            name
            merchantCode
            sellingPlans(first: 5) { nodes { id name } }
        }
    }
}";

pub const GET_COLLECTION_PRODUCT_IDS: &str = r"
query GetCollectionProductIds($id: ID!, $first: Int!) {
    collection(id: $id) {
        products(first: $first) { nodes { id } }
    }
}";

pub const ORDER_EDIT_BEGIN: &str = r"
mutation OrderEditBegin($id: ID!) {
    orderEditBegin(id: $id) {
        calculatedOrder { id }
        userErrors { field message }
    }
}";

pub const ORDER_EDIT_ADD_CUSTOM_ITEM: &str = r"
mutation OrderEditAddCustomItem($id: ID!, $title: String!, $price: MoneyInput!, $quantity: Int!) {
    orderEditAddCustomItem(id: $id, title: $title, price: $price, quantity: $quantity) {
        calculatedLineItem { id }
        userErrors { field message }
    }
}";

pub const ORDER_EDIT_COMMIT: &str = r"
mutation OrderEditCommit($id: ID!, $notifyCustomer: Boolean, $staffNote: String) {
    orderEditCommit(id: $id, notifyCustomer: $notifyCustomer, staffNote: $staffNote) {
        order { id }
        userErrors { field message }
    }
}";

pub const GET_WEBHOOK_SUBSCRIPTIONS: &str = r"
query GetWebhookSubscriptions($first: Int!) {
    webhookSubscriptions(first: $first) {
        nodes {
            id
            topic
            endpoint {
                ... on WebhookHttpEndpoint { callbackUrl }
            }
        }
    }
}";

pub const WEBHOOK_SUBSCRIPTION_CREATE: &str = r"
mutation WebhookSubscriptionCreate($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
    webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
        webhookSubscription {
            id
            topic
            endpoint {
                ... on WebhookHttpEndpoint { callbackUrl }
            }
        }
        userErrors { field message }
    }
}";

pub const WEBHOOK_SUBSCRIPTION_DELETE: &str = r"
mutation WebhookSubscriptionDelete($id: ID!) {
    webhookSubscriptionDelete(id: $id) {
        deletedWebhookSubscriptionId
        userErrors { field message }
    }
}";
