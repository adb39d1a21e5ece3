//! GraphQL document for the marketplace search operation

/// Operation name sent alongside the document
pub const OPERATION_NAME: &str = "SearchQuery";

/// Search query with the announcement fragment.
///
/// Only `announcements` is read back from the response.
pub const SEARCH_QUERY: &str = r#"query SearchQuery($q: String, $filter: SearchFilterInput, $mediaSize: MediaSize = MEDIUM) {
  search(q: $q, filter: $filter) {
    announcements {
      data {
        ...AnnouncementContent
        smallDescription {
          valueText
          __typename
        }
        noAdsense
        __typename
      }
      paginatorInfo {
        lastPage
        hasMorePages
        __typename
      }
      __typename
    }
    active {
      category {
        id
        name
        slug
        icon
        delivery
        deliveryType
        priceUnits
        children {
          id
          name
          slug
          icon
          __typename
        }
        specifications {
          isRequired
          specification {
            id
            codename
            label
            type
            class
            datasets {
              codename
              label
              __typename
            }
            dependsOn {
              id
              codename
              __typename
            }
            subSpecifications {
              id
              codename
              label
              type
              __typename
            }
            allSubSpecificationCodenames
            __typename
          }
          __typename
        }
        parentTree {
          id
          name
          slug
          icon
          children {
            id
            name
            slug
            icon
            __typename
          }
          __typename
        }
        parent {
          id
          name
          icon
          slug
          __typename
        }
        __typename
      }
      count
      filter {
        cities {
          id
          name
          __typename
        }
        regions {
          id
          name
          __typename
        }
        __typename
      }
      __typename
    }
    suggested {
      category {
        id
        name
        slug
        icon
        __typename
      }
      count
      __typename
    }
    __typename
  }
}

fragment AnnouncementContent on Announcement {
  id
  title
  slug
  createdAt: refreshedAt
  isFromStore
  isCommentEnabled
  userReaction {
    isBookmarked
    isLiked
    __typename
  }
  hasDelivery
  deliveryType
  likeCount
  description
  status
  cities {
    id
    name
    slug
    region {
      id
      name
      slug
      __typename
    }
    __typename
  }
  store {
    id
    name
    slug
    imageUrl
    isOfficial
    isVerified
    __typename
  }
  user {
    id
    __typename
  }
  defaultMedia(size: $mediaSize) {
    mediaUrl
    mimeType
    thumbnail
    __typename
  }
  price
  pricePreview
  priceUnit
  oldPrice
  oldPricePreview
  priceType
  exchangeType
  category {
    id
    slug
    __typename
  }
  __typename
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_declares_operation() {
        assert!(SEARCH_QUERY.starts_with("query SearchQuery("));
        assert!(SEARCH_QUERY.contains("fragment AnnouncementContent on Announcement"));
    }

    #[test]
    fn test_document_selects_paginator_info() {
        assert!(SEARCH_QUERY.contains("paginatorInfo {"));
        assert!(SEARCH_QUERY.contains("hasMorePages"));
        assert!(SEARCH_QUERY.contains("defaultMedia(size: $mediaSize)"));
    }
}
